//! Typed subscription over `notify` events for one notes directory.

use super::{WatchError, WatchEvent, WatchEventKind, WatchScope};
use crate::config::{NotesConfig, WatchBackend};
use log::{debug, info, warn};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

enum Signal {
    Fs(notify::Result<Event>),
    Close,
}

/// Result of `FsSubscription::next_event`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    Event(WatchEvent),
    Timeout,
    Closed,
}

/// Cloneable handle that unsubscribes an `FsSubscription` from any thread.
#[derive(Clone)]
pub struct SubscriptionCloser {
    closed: Arc<AtomicBool>,
    tx: Sender<Signal>,
}

impl SubscriptionCloser {
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let _ = self.tx.send(Signal::Close);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Root + contents watches for the notes directory.
///
/// Dropping the subscription releases both watches.
pub struct FsSubscription {
    watcher: Box<dyn Watcher + Send>,
    rx: Receiver<Signal>,
    closer: SubscriptionCloser,
    project_root: PathBuf,
    notes_dir: PathBuf,
    contents_watched: bool,
    pending: VecDeque<WatchEvent>,
}

impl FsSubscription {
    pub fn open(config: &NotesConfig) -> Result<Self, WatchError> {
        // Backends report canonical paths on some platforms (/private/var on macOS).
        let project_root = config
            .project_root
            .canonicalize()
            .unwrap_or_else(|_| config.project_root.clone());
        let notes_dir = project_root.join(&config.notes_dir_name);

        let (tx, rx) = channel();
        let handler_tx = tx.clone();
        let handler = move |res: notify::Result<Event>| {
            let _ = handler_tx.send(Signal::Fs(res));
        };
        let mut watcher: Box<dyn Watcher + Send> = match config.watch_backend {
            WatchBackend::Native => Box::new(
                RecommendedWatcher::new(handler, notify::Config::default())
                    .map_err(WatchError::Create)?,
            ),
            WatchBackend::Poll => Box::new(
                PollWatcher::new(
                    handler,
                    notify::Config::default()
                        .with_poll_interval(config.poll_interval())
                        .with_compare_contents(false),
                )
                .map_err(WatchError::Create)?,
            ),
        };

        watcher
            .watch(&project_root, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::Watch {
                path: project_root.clone(),
                source,
            })?;

        let mut subscription = Self {
            watcher,
            rx,
            closer: SubscriptionCloser {
                closed: Arc::new(AtomicBool::new(false)),
                tx,
            },
            project_root,
            notes_dir,
            contents_watched: false,
            pending: VecDeque::new(),
        };
        if subscription.notes_dir.is_dir() {
            subscription.watch_contents();
        }

        info!(
            "event=watch_open module=watch status=ok backend={:?} root={} contents_watched={}",
            config.watch_backend,
            subscription.project_root.display(),
            subscription.contents_watched
        );
        Ok(subscription)
    }

    pub fn closer(&self) -> SubscriptionCloser {
        self.closer.clone()
    }

    pub fn notes_dir(&self) -> &Path {
        &self.notes_dir
    }

    pub fn is_watching_contents(&self) -> bool {
        self.contents_watched
    }

    /// Blocks until the next relevant event, the timeout, or close.
    ///
    /// `None` waits without a timeout.
    pub fn next_event(&mut self, timeout: Option<Duration>) -> Next {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        loop {
            if self.closer.is_closed() {
                return Next::Closed;
            }
            if let Some(event) = self.pending.pop_front() {
                return Next::Event(event);
            }

            let signal = match deadline {
                None => match self.rx.recv() {
                    Ok(signal) => signal,
                    Err(_) => return Next::Closed,
                },
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    match self.rx.recv_timeout(remaining) {
                        Ok(signal) => signal,
                        Err(RecvTimeoutError::Timeout) => return Next::Timeout,
                        Err(RecvTimeoutError::Disconnected) => return Next::Closed,
                    }
                }
            };

            match signal {
                Signal::Close => return Next::Closed,
                Signal::Fs(Err(err)) => {
                    warn!("event=watch_error module=watch status=error error={}", err);
                }
                Signal::Fs(Ok(event)) => {
                    for watch_event in classify(&event, &self.notes_dir) {
                        self.track_directory(&watch_event);
                        self.pending.push_back(watch_event);
                    }
                }
            }
        }
    }

    /// Releases both watches.
    pub fn close(mut self) {
        self.closer.close();
        self.unwatch_contents();
        if let Err(err) = self.watcher.unwatch(&self.project_root) {
            debug!("event=watch_close module=watch status=unwatch_root error={}", err);
        }
        info!("event=watch_close module=watch status=ok");
    }

    fn track_directory(&mut self, event: &WatchEvent) {
        if event.scope != WatchScope::Directory {
            return;
        }
        match event.kind {
            WatchEventKind::Created => self.watch_contents(),
            WatchEventKind::Deleted => self.unwatch_contents(),
        }
    }

    fn watch_contents(&mut self) {
        if self.contents_watched {
            // A recreated directory is a new inode; drop the stale registration.
            self.unwatch_contents();
        }
        match self
            .watcher
            .watch(&self.notes_dir, RecursiveMode::NonRecursive)
        {
            Ok(()) => self.contents_watched = true,
            Err(err) => warn!(
                "event=watch_contents module=watch status=error path={} error={}",
                self.notes_dir.display(),
                err
            ),
        }
    }

    fn unwatch_contents(&mut self) {
        if !self.contents_watched {
            return;
        }
        self.contents_watched = false;
        // The backend may already have dropped the watch with the directory.
        if let Err(err) = self.watcher.unwatch(&self.notes_dir) {
            debug!(
                "event=unwatch_contents module=watch status=stale error={}",
                err
            );
        }
    }
}

/// Maps one raw `notify` event to the Created/Deleted events it implies for
/// `notes_dir` and its direct children.
pub fn classify(event: &Event, notes_dir: &Path) -> Vec<WatchEvent> {
    let mut out = Vec::new();
    for (index, path) in event.paths.iter().enumerate() {
        let kind = match event.kind {
            EventKind::Create(_) => WatchEventKind::Created,
            EventKind::Remove(_) => WatchEventKind::Deleted,
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => WatchEventKind::Deleted,
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => WatchEventKind::Created,
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                if index == 0 {
                    WatchEventKind::Deleted
                } else {
                    WatchEventKind::Created
                }
            }
            EventKind::Modify(ModifyKind::Name(_)) => {
                if path.exists() {
                    WatchEventKind::Created
                } else {
                    WatchEventKind::Deleted
                }
            }
            _ => continue,
        };

        let scope = if path == notes_dir {
            WatchScope::Directory
        } else if path.parent() == Some(notes_dir) {
            WatchScope::Contents
        } else {
            continue;
        };

        out.push(WatchEvent {
            scope,
            kind,
            path: path.clone(),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::classify;
    use crate::watch::{WatchEventKind, WatchScope};
    use notify::event::{CreateKind, DataChange, ModifyKind, RemoveKind, RenameMode};
    use notify::{Event, EventKind};
    use std::path::{Path, PathBuf};

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        let mut event = Event::new(kind);
        for path in paths {
            event = event.add_path(PathBuf::from(path));
        }
        event
    }

    #[test]
    fn classify_maps_directory_and_contents_scopes() {
        let notes = Path::new("/p/.notes");

        let created = classify(
            &event(EventKind::Create(CreateKind::Folder), &["/p/.notes"]),
            notes,
        );
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].scope, WatchScope::Directory);
        assert_eq!(created[0].kind, WatchEventKind::Created);

        let removed = classify(
            &event(EventKind::Remove(RemoveKind::File), &["/p/.notes/a.txt"]),
            notes,
        );
        assert_eq!(removed[0].scope, WatchScope::Contents);
        assert_eq!(removed[0].kind, WatchEventKind::Deleted);
    }

    #[test]
    fn classify_ignores_unrelated_paths_and_modifications() {
        let notes = Path::new("/p/.notes");
        assert!(classify(
            &event(EventKind::Create(CreateKind::File), &["/p/.gitignore"]),
            notes
        )
        .is_empty());
        assert!(classify(
            &event(EventKind::Create(CreateKind::File), &["/p/.notes/sub/deep.txt"]),
            notes
        )
        .is_empty());
        assert!(classify(
            &event(
                EventKind::Modify(ModifyKind::Data(DataChange::Content)),
                &["/p/.notes/a.txt"]
            ),
            notes
        )
        .is_empty());
    }

    #[test]
    fn classify_splits_renames_into_delete_and_create() {
        let notes = Path::new("/p/.notes");
        let events = classify(
            &event(
                EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
                &["/p/.notes/old.txt", "/p/.notes/new.txt"],
            ),
            notes,
        );
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, WatchEventKind::Deleted);
        assert_eq!(events[1].kind, WatchEventKind::Created);
        assert_eq!(events[1].path, PathBuf::from("/p/.notes/new.txt"));
    }
}
