use std::path::PathBuf;
use std::sync::Mutex;
use std::time::SystemTime;

use color_eyre::Result;
use tokio::sync::broadcast;

/// A new version of the page took control and a reload would show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerChange;

/// Source of "new content available" signals.
///
/// `check` asks the source to look for an update; when one is found every
/// subscriber receives a [`ControllerChange`].
pub trait UpdateRegistration: Send + Sync {
    fn check(&self) -> Result<()>;

    fn subscribe(&self) -> broadcast::Receiver<ControllerChange>;
}

/// Watches the site content file and announces a change of its
/// modification time.
pub struct ContentWatcher {
    path: PathBuf,
    last_modified: Mutex<Option<SystemTime>>,
    tx: broadcast::Sender<ControllerChange>,
}

impl ContentWatcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let last_modified = modified(&path);
        let (tx, _) = broadcast::channel(4);
        Self {
            path,
            last_modified: Mutex::new(last_modified),
            tx,
        }
    }
}

impl UpdateRegistration for ContentWatcher {
    fn check(&self) -> Result<()> {
        let current = modified(&self.path);
        let mut last = self
            .last_modified
            .lock()
            .map_err(|_| color_eyre::eyre::eyre!("Content watcher state poisoned"))?;

        if current.is_some() && current != *last {
            tracing::info!(path = %self.path.display(), "Site content changed");
            *last = current;
            // No receivers just means nobody is showing the banner yet.
            let _ = self.tx.send(ControllerChange);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ControllerChange> {
        self.tx.subscribe()
    }
}

fn modified(path: &std::path::Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_unchanged_file_is_quiet() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let watcher = ContentWatcher::new(file.path());
        let mut rx = watcher.subscribe();

        watcher.check().unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_modified_file_announces_change_once() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let watcher = ContentWatcher::new(file.path());
        let mut rx = watcher.subscribe();

        let later = SystemTime::now() + Duration::from_secs(60);
        file.as_file().set_modified(later).unwrap();

        watcher.check().unwrap();
        assert_eq!(rx.try_recv().unwrap(), ControllerChange);

        watcher.check().unwrap();
        assert!(rx.try_recv().is_err());
    }
}
