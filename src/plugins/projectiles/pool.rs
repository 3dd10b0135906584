use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    Player,
    Enemy,
}

/// One pool slot. `active == false` means free; nothing is ever allocated per shot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bullet {
    pub active: bool,
    pub owner: Owner,
    pub position: Vec3,
    pub velocity: Vec3,
    pub ttl: f32,
}

impl Bullet {
    const FREE: Self = Self {
        active: false,
        owner: Owner::Player,
        position: Vec3::ZERO,
        velocity: Vec3::ZERO,
        ttl: 0.0,
    };
}

/// Fixed-capacity pool shared by both factions.
///
/// Acquisition scans forward from a rotating cursor for a free slot. When every slot is live
/// the slot under the cursor is overwritten: under sustained fire the pool recycles instead of
/// growing.
#[derive(Resource, Debug)]
pub struct BulletPool {
    slots: Vec<Bullet>,
    cursor: usize,
    /// Run the live contents belong to.
    run_id: Option<u32>,
}

impl BulletPool {
    /// # Panics
    /// If `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "bullet pool needs at least one slot");
        Self {
            slots: vec![Bullet::FREE; capacity],
            cursor: 0,
            run_id: None,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn slots(&self) -> &[Bullet] {
        &self.slots
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|b| b.active).count()
    }

    /// Index of the slot the next shot will use; advances the cursor past it.
    pub fn acquire(&mut self) -> usize {
        let cap = self.slots.len();
        let idx = (0..cap)
            .map(|i| (self.cursor + i) % cap)
            .find(|&i| !self.slots[i].active)
            .unwrap_or(self.cursor);
        self.cursor = (idx + 1) % cap;
        idx
    }

    pub fn spawn(&mut self, owner: Owner, position: Vec3, velocity: Vec3, ttl: f32) -> usize {
        let idx = self.acquire();
        self.slots[idx] = Bullet { active: true, owner, position, velocity, ttl };
        idx
    }

    #[inline]
    pub fn deactivate(&mut self, idx: usize) {
        self.slots[idx].active = false;
    }

    /// Free every slot and rewind the cursor.
    pub fn reset(&mut self) {
        self.slots.fill(Bullet::FREE);
        self.cursor = 0;
    }

    /// Reset if `run_id` differs from the run the pool last served.
    pub fn sync_run(&mut self, run_id: u32) -> bool {
        if self.run_id == Some(run_id) {
            return false;
        }
        self.run_id = Some(run_id);
        self.reset();
        true
    }

    /// Age and move every live bullet. TTL is charged before the move; a bullet that runs out
    /// or leaves `[min, max]` is freed.
    pub fn advance(&mut self, dt: f32, min: Vec3, max: Vec3) {
        for b in self.slots.iter_mut().filter(|b| b.active) {
            b.ttl -= dt;
            if b.ttl <= 0.0 {
                b.active = false;
                continue;
            }
            b.position += b.velocity * dt;
            let p = b.position;
            if p.cmplt(min).any() || p.cmpgt(max).any() {
                b.active = false;
            }
        }
    }
}
