use glam::Vec3;

/// Fixed-capacity FIFO of recent positions; the oldest point is evicted first.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailBuffer {
    points: Vec<Vec3>,
    capacity: usize,
    /// Slot holding the oldest point once the buffer has wrapped.
    head: usize,
}

impl TrailBuffer {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: Vec::with_capacity(capacity),
            capacity,
            head: 0,
        }
    }

    pub fn push(&mut self, point: Vec3) {
        if self.points.len() < self.capacity {
            self.points.push(point);
        } else {
            self.points[self.head] = point;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Points from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        let (newer, older) = self.points.split_at(self.head);
        older.iter().chain(newer.iter()).copied()
    }

    pub fn newest(&self) -> Option<Vec3> {
        if self.points.is_empty() {
            return None;
        }
        let index = (self.head + self.points.len() - 1) % self.points.len();
        Some(self.points[index])
    }

    pub fn oldest(&self) -> Option<Vec3> {
        self.points.get(self.head).copied()
    }

    pub fn to_vec(&self) -> Vec<Vec3> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32) -> Vec3 {
        Vec3::new(x, 0.0, 0.0)
    }

    #[test]
    fn fills_in_order() {
        let mut trail = TrailBuffer::new(3);
        trail.push(p(1.0));
        trail.push(p(2.0));
        assert_eq!(trail.to_vec(), vec![p(1.0), p(2.0)]);
        assert_eq!(trail.oldest(), Some(p(1.0)));
        assert_eq!(trail.newest(), Some(p(2.0)));
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut trail = TrailBuffer::new(3);
        for i in 1..=5 {
            trail.push(p(i as f32));
        }
        assert_eq!(trail.len(), 3);
        assert_eq!(trail.to_vec(), vec![p(3.0), p(4.0), p(5.0)]);
        assert_eq!(trail.oldest(), Some(p(3.0)));
        assert_eq!(trail.newest(), Some(p(5.0)));
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut trail = TrailBuffer::new(50);
        for i in 0..1000 {
            trail.push(p(i as f32));
            assert!(trail.len() <= 50);
        }
        assert_eq!(trail.newest(), Some(p(999.0)));
        assert_eq!(trail.oldest(), Some(p(950.0)));
    }

    #[test]
    fn zero_capacity_holds_latest_point() {
        let mut trail = TrailBuffer::new(0);
        trail.push(p(1.0));
        trail.push(p(2.0));
        assert_eq!(trail.capacity(), 1);
        assert_eq!(trail.to_vec(), vec![p(2.0)]);
    }

    #[test]
    fn empty_trail() {
        let trail = TrailBuffer::new(4);
        assert!(trail.is_empty());
        assert_eq!(trail.newest(), None);
        assert_eq!(trail.oldest(), None);
    }
}
