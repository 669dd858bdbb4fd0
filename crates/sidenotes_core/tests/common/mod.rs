#![allow(dead_code)]

use sidenotes_core::{
    FsStorageGateway, HostBindings, NamePrompt, NotesConfig, SharedContext, SyncController,
    UserNotifier,
};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Prompt that replays scripted answers and counts how often it was asked.
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<Option<String>>>,
    asked: Mutex<usize>,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[Option<&str>]) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.iter().map(|a| a.map(str::to_string)).collect()),
            asked: Mutex::new(0),
        })
    }

    pub fn times_asked(&self) -> usize {
        *self.asked.lock().unwrap()
    }
}

impl NamePrompt for ScriptedPrompt {
    fn prompt_note_name(&self, _prompt: &str) -> Option<String> {
        *self.asked.lock().unwrap() += 1;
        self.answers.lock().unwrap().pop_front().flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Info(String),
    Warn(String),
    Error(String),
}

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<Message>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter_map(|message| match message {
                Message::Error(text) => Some(text),
                _ => None,
            })
            .collect()
    }
}

impl UserNotifier for RecordingNotifier {
    fn info(&self, message: &str) {
        self.messages.lock().unwrap().push(Message::Info(message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.messages.lock().unwrap().push(Message::Warn(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.messages.lock().unwrap().push(Message::Error(message.to_string()));
    }
}

pub struct Harness {
    pub root: TempDir,
    pub config: NotesConfig,
    pub prompt: Arc<ScriptedPrompt>,
    pub notifier: Arc<RecordingNotifier>,
    pub context: SharedContext,
    pub controller: Arc<SyncController<FsStorageGateway>>,
}

impl Harness {
    pub fn new(answers: &[Option<&str>]) -> Self {
        let root = tempfile::tempdir().unwrap();
        Self::with_config(root, answers, |_| {})
    }

    pub fn with_config(
        root: TempDir,
        answers: &[Option<&str>],
        tweak: impl FnOnce(&mut NotesConfig),
    ) -> Self {
        let mut config = NotesConfig::new(root.path());
        tweak(&mut config);
        let prompt = ScriptedPrompt::answering(answers);
        let notifier = Arc::new(RecordingNotifier::default());
        let context = SharedContext::new();
        let bindings = HostBindings {
            prompt: prompt.clone(),
            notifier: notifier.clone(),
            context: Arc::new(context.clone()),
        };
        let controller = Arc::new(SyncController::from_config(&config, bindings).unwrap());
        Self {
            root,
            config,
            prompt,
            notifier,
            context,
            controller,
        }
    }

    pub fn notes_dir(&self) -> std::path::PathBuf {
        self.config.notes_dir()
    }

    pub fn published_count(&self) -> Option<usize> {
        self.context.get(&self.config.context_key)
    }
}

pub fn write_file(path: &Path, content: &str) {
    std::fs::write(path, content).unwrap();
}

/// Polls `condition` until it holds or `timeout` elapses.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    condition()
}
