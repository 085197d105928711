use uuid::Uuid;

/// Per-application bookkeeping for open drawing surfaces.
///
/// Passed explicitly to surface constructors and `close`, so two sessions
/// (for example two test cases) never share a window count.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    /// Surfaces ever opened; also the number of the most recent one
    opened: usize,
    /// Surfaces currently open
    open: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            opened: 0,
            open: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Register a new surface and return its window number (1-based)
    pub fn open_surface(&mut self) -> usize {
        self.opened += 1;
        self.open += 1;
        self.opened
    }

    pub fn close_surface(&mut self) {
        self.open = self.open.saturating_sub(1);
    }

    pub fn open_count(&self) -> usize {
        self.open
    }

    pub fn opened_count(&self) -> usize {
        self.opened
    }
}
