use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// At-most-one sync operation per project id. Concurrent syncs racing
/// against the same local collections are the one real hazard in this
/// design, so the loser is turned away immediately instead of queued.
#[derive(Clone, Default)]
pub struct InFlightGuard {
    active: Arc<Mutex<HashSet<String>>>,
}

impl InFlightGuard {
    pub fn try_begin(&self, project_id: &str) -> Option<InFlightPermit> {
        let mut active = self.active.lock().unwrap();
        if !active.insert(project_id.to_string()) {
            return None;
        }
        Some(InFlightPermit {
            active: self.active.clone(),
            project_id: project_id.to_string(),
        })
    }

    pub fn is_busy(&self, project_id: &str) -> bool {
        self.active.lock().unwrap().contains(project_id)
    }
}

/// Releases the project slot on drop, including on early returns and
/// cancellations.
pub struct InFlightPermit {
    active: Arc<Mutex<HashSet<String>>>,
    project_id: String,
}

impl Drop for InFlightPermit {
    fn drop(&mut self) {
        self.active.lock().unwrap().remove(&self.project_id);
    }
}
