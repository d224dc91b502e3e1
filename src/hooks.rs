use std::collections::VecDeque;

/// Fire-and-forget player feedback. Nothing the simulation does depends on it.
pub trait Notifier {
    fn message(&mut self, text: &str, duration_ms: u32);
    fn prompt(&mut self, text: Option<&str>);
}

/// Final numbers of one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub day: u32,
    pub total_items_collected: u32,
    pub fish_caught: u32,
}

/// Receives every finished run exactly once.
pub trait RunRecorder {
    fn record_run(&mut self, summary: RunSummary);
}

impl RunRecorder for Vec<RunSummary> {
    fn record_run(&mut self, summary: RunSummary) {
        self.push(summary);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub text: String,
    pub remaining: f32,
}

/// On-screen message queue plus the current interaction prompt.
#[derive(Clone, Debug, Default)]
pub struct MessageLog {
    messages: VecDeque<Message>,
    prompt: Option<String>,
    max_visible: usize,
}

impl MessageLog {
    pub fn new(max_visible: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            prompt: None,
            max_visible: max_visible.max(1),
        }
    }

    /// Age messages by `dt` seconds and drop the expired ones.
    pub fn tick(&mut self, dt: f32) {
        for m in &mut self.messages {
            m.remaining -= dt;
        }
        self.messages.retain(|m| m.remaining > 0.0);
    }

    pub fn active(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn latest(&self) -> Option<&str> {
        self.messages.back().map(|m| m.text.as_str())
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.text.contains(needle))
    }

    pub fn current_prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.prompt = None;
    }
}

impl Notifier for MessageLog {
    fn message(&mut self, text: &str, duration_ms: u32) {
        log::debug!("message: {text}");
        self.messages.push_back(Message {
            text: text.to_string(),
            remaining: duration_ms as f32 / 1000.0,
        });
        while self.messages.len() > self.max_visible {
            self.messages.pop_front();
        }
    }

    fn prompt(&mut self, text: Option<&str>) {
        self.prompt = text.map(str::to_string);
    }
}
