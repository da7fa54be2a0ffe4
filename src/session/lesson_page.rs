use std::collections::BTreeMap;

use crate::catalog::Lesson;
use crate::generator::content::{ImageData, LessonContent};
use crate::generator::error::GenerationError;
use crate::session::request::RequestToken;

/// Progress of one piece of generated content.
#[derive(Debug)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    /// Message for the error panel.
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ImageSlot {
    Pending,
    Ready(ImageData),
    Failed,
}

pub struct LessonPage {
    pub lesson: &'static Lesson,
    pub token: RequestToken,
    pub content: LoadState<LessonContent>,
    /// Keyed by section index; only sections with an image prompt appear.
    pub images: BTreeMap<usize, ImageSlot>,
    pub scroll: u16,
    /// Largest offset that still shows text, set from the last render.
    scroll_limit: u16,
}

impl LessonPage {
    pub fn new(lesson: &'static Lesson, token: RequestToken) -> Self {
        Self {
            lesson,
            token,
            content: LoadState::Loading,
            images: BTreeMap::new(),
            scroll: 0,
            scroll_limit: 0,
        }
    }

    /// Start over under a fresh token, e.g. after `[r] Retry`.
    pub fn restart(&mut self, token: RequestToken) {
        self.token = token;
        self.content = LoadState::Loading;
        self.images.clear();
        self.scroll = 0;
    }

    /// Store the lesson text. Returns the (section, prompt) pairs whose
    /// images should now be requested; each gets a pending slot.
    pub fn receive_lesson(
        &mut self,
        result: Result<LessonContent, GenerationError>,
        with_images: bool,
    ) -> Vec<(usize, String)> {
        match result {
            Ok(content) => {
                let prompts: Vec<(usize, String)> = if with_images {
                    content
                        .image_prompts()
                        .map(|(i, p)| (i, p.to_string()))
                        .collect()
                } else {
                    Vec::new()
                };
                for (section, _) in &prompts {
                    self.images.insert(*section, ImageSlot::Pending);
                }
                self.content = LoadState::Ready(content);
                prompts
            }
            Err(e) => {
                self.content = LoadState::Failed(e.to_string());
                Vec::new()
            }
        }
    }

    /// Fill one image slot. Other slots are left as they are.
    pub fn receive_image(&mut self, section: usize, result: Result<ImageData, GenerationError>) {
        let Some(slot) = self.images.get_mut(&section) else {
            return;
        };
        *slot = match result {
            Ok(image) => ImageSlot::Ready(image),
            Err(_) => ImageSlot::Failed,
        };
    }

    pub fn image(&self, section: usize) -> Option<&ImageSlot> {
        self.images.get(&section)
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines).min(self.scroll_limit);
    }

    /// Content can shrink between renders (resize, retry), so the current
    /// offset is pulled back too.
    pub fn set_scroll_limit(&mut self, limit: u16) {
        self.scroll_limit = limit;
        self.scroll = self.scroll.min(limit);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }
}
