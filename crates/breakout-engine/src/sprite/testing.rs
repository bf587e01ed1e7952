//! In-memory `StreamBackend` that records every call, for unit tests.

use super::{SpriteVertex, StreamBackend};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    Bind,
    Unbind,
    Texture(u32),
    WhiteTexture,
    Upload { base: u32, len: usize },
    Draw { first: u32, count: u32 },
    Fence(u32),
    Wait(u32),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub events: Vec<Event>,
    pub uploads: Vec<(u32, Vec<SpriteVertex>)>,
    next_fence: u32,
    completed_below: u32,
}

impl RecordingBackend {
    /// Marks every fence issued so far as signaled.
    pub fn complete_all(&mut self) {
        self.completed_below = self.next_fence;
    }

    pub fn draws(&self) -> Vec<(u32, u32)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Draw { first, count } => Some((*first, *count)),
                _ => None,
            })
            .collect()
    }

    pub fn waits(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Wait(f) => Some(*f),
                _ => None,
            })
            .collect()
    }
}

impl StreamBackend for RecordingBackend {
    type Fence = u32;
    type Target = ();
    type Texture = u32;

    fn bind(&mut self, _target: ()) {
        self.events.push(Event::Bind);
    }

    fn unbind(&mut self) {
        self.events.push(Event::Unbind);
    }

    fn bind_texture(&mut self, texture: &u32) {
        self.events.push(Event::Texture(*texture));
    }

    fn bind_white_texture(&mut self) {
        self.events.push(Event::WhiteTexture);
    }

    fn upload(&mut self, base_vertex: u32, vertices: &[SpriteVertex]) {
        self.events.push(Event::Upload {
            base: base_vertex,
            len: vertices.len(),
        });
        self.uploads.push((base_vertex, vertices.to_vec()));
    }

    fn draw(&mut self, first_vertex: u32, vertex_count: u32) {
        self.events.push(Event::Draw {
            first: first_vertex,
            count: vertex_count,
        });
    }

    fn insert_fence(&mut self) -> u32 {
        let fence = self.next_fence;
        self.next_fence += 1;
        self.events.push(Event::Fence(fence));
        fence
    }

    fn is_signaled(&mut self, fence: &u32) -> bool {
        *fence < self.completed_below
    }

    fn wait(&mut self, fence: &u32) {
        self.events.push(Event::Wait(*fence));
        self.completed_below = self.completed_below.max(fence + 1);
    }
}
