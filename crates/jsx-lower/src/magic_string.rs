use std::collections::HashMap;
use std::mem;

/// Positional, non-destructive text splicing over an immutable original
/// string. Edits are registered against byte offsets of the original and
/// materialized once by [`MagicString::to_string`]; the original is never
/// mutated, so offsets stay valid for the whole pass.
///
/// Composition at equal offsets: `append_*` accumulates in registration
/// order, `prepend_*` lands to the left of text already registered at the
/// same offset. Text inserted with `*_left` attaches to the content ending
/// at the offset and text inserted with `*_right` attaches to the content
/// starting there, so a `*_left` insertion always renders before a
/// `*_right` insertion at the same position. `move_range` carries a span's
/// already-registered insertions along with it.
pub struct MagicString {
    original: String,
    intro: String,
    outro: String,
    chunks: Vec<Chunk>,
    first: usize,
    last: usize,
    by_start: HashMap<usize, usize>,
    by_end: HashMap<usize, usize>,
}

#[derive(Debug)]
struct Chunk {
    start: usize,
    end: usize,
    intro: String,
    outro: String,
    /// `None` means the chunk still renders its slice of the original.
    content: Option<String>,
    prev: Option<usize>,
    next: Option<usize>,
}

impl Chunk {
    fn new(start: usize, end: usize) -> Self {
        Chunk {
            start,
            end,
            intro: String::new(),
            outro: String::new(),
            content: None,
            prev: None,
            next: None,
        }
    }
}

impl MagicString {
    pub fn new(original: &str) -> Self {
        let chunk = Chunk::new(0, original.len());
        let mut by_start = HashMap::new();
        let mut by_end = HashMap::new();
        by_start.insert(0, 0);
        by_end.insert(original.len(), 0);
        MagicString {
            original: original.to_owned(),
            intro: String::new(),
            outro: String::new(),
            chunks: vec![chunk],
            first: 0,
            last: 0,
            by_start,
            by_end,
        }
    }

    /// Insert after any content previously registered at `index`.
    pub fn append_left(&mut self, index: usize, text: &str) {
        self.split(index);
        match self.by_end.get(&index) {
            Some(&id) => self.chunks[id].outro.push_str(text),
            None => self.intro.push_str(text),
        }
    }

    /// Insert before any content previously registered at `index`.
    pub fn prepend_left(&mut self, index: usize, text: &str) {
        self.split(index);
        match self.by_end.get(&index) {
            Some(&id) => {
                let outro = &mut self.chunks[id].outro;
                *outro = format!("{text}{outro}");
            }
            None => self.intro = format!("{text}{}", self.intro),
        }
    }

    /// Like [`append_left`], but the text attaches to the content starting
    /// at `index` and therefore travels with it if that span is moved.
    pub fn append_right(&mut self, index: usize, text: &str) {
        self.split(index);
        match self.by_start.get(&index) {
            Some(&id) => self.chunks[id].intro.push_str(text),
            None => self.outro.push_str(text),
        }
    }

    pub fn prepend_right(&mut self, index: usize, text: &str) {
        self.split(index);
        match self.by_start.get(&index) {
            Some(&id) => {
                let intro = &mut self.chunks[id].intro;
                *intro = format!("{text}{intro}");
            }
            None => self.outro = format!("{text}{}", self.outro),
        }
    }

    /// Replace `start..end` of the original with `text`. Content-only:
    /// insertions already attached at the boundaries of the range are kept.
    pub fn overwrite(&mut self, start: usize, end: usize, text: &str) {
        assert!(start < end, "overwrite requires a non-empty range");
        self.split(start);
        self.split(end);
        let mut id = self.by_start[&start];
        let mut first = true;
        loop {
            let chunk = &mut self.chunks[id];
            chunk.content = Some(if first { text.to_owned() } else { String::new() });
            first = false;
            if chunk.end == end {
                break;
            }
            id = chunk.next.expect("overwrite ran past the end of the buffer");
        }
    }

    /// Delete `start..end` of the original, along with any insertions
    /// attached inside the range.
    pub fn remove(&mut self, start: usize, end: usize) {
        if start == end {
            return;
        }
        assert!(start < end, "remove requires an ordered range");
        self.split(start);
        self.split(end);
        let mut id = self.by_start[&start];
        loop {
            let chunk = &mut self.chunks[id];
            chunk.intro.clear();
            chunk.outro.clear();
            chunk.content = Some(String::new());
            if chunk.end == end {
                break;
            }
            id = chunk.next.expect("remove ran past the end of the buffer");
        }
    }

    /// Detach `start..end` and re-insert it immediately before the content
    /// at `index`, carrying attached insertions along.
    pub fn move_range(&mut self, start: usize, end: usize, index: usize) {
        assert!(
            index <= start || index >= end,
            "cannot move a range inside itself"
        );
        self.split(start);
        self.split(end);
        self.split(index);

        let first = self.by_start[&start];
        let last = self.by_end[&end];
        let old_prev = self.chunks[first].prev;
        let old_next = self.chunks[last].next;
        let new_next = self.by_start.get(&index).copied();
        if new_next == Some(first) || (new_next.is_none() && last == self.last) {
            return;
        }

        // Detach.
        match old_prev {
            Some(p) => self.chunks[p].next = old_next,
            None => self.first = old_next.expect("cannot move the entire buffer"),
        }
        match old_next {
            Some(n) => self.chunks[n].prev = old_prev,
            None => self.last = old_prev.expect("cannot move the entire buffer"),
        }

        // Re-insert before `new_next` (or at the very end).
        let new_prev = match new_next {
            Some(n) => self.chunks[n].prev,
            None => Some(self.last),
        };
        match new_prev {
            Some(p) => self.chunks[p].next = Some(first),
            None => self.first = first,
        }
        self.chunks[first].prev = new_prev;
        self.chunks[last].next = new_next;
        match new_next {
            Some(n) => self.chunks[n].prev = Some(last),
            None => self.last = last,
        }
    }

    fn split(&mut self, index: usize) {
        if index == 0 || index >= self.original.len() || self.by_start.contains_key(&index) {
            return;
        }
        let id = (0..self.chunks.len())
            .find(|&i| self.chunks[i].start < index && index < self.chunks[i].end)
            .expect("split index outside the buffer");
        assert!(
            self.chunks[id].content.is_none(),
            "cannot split a chunk that has already been edited"
        );

        let new_id = self.chunks.len();
        let old_next = self.chunks[id].next;
        let chunk = &mut self.chunks[id];
        let mut new_chunk = Chunk::new(index, chunk.end);
        new_chunk.outro = mem::take(&mut chunk.outro);
        new_chunk.prev = Some(id);
        new_chunk.next = old_next;
        chunk.end = index;
        chunk.next = Some(new_id);
        self.chunks.push(new_chunk);

        if let Some(n) = old_next {
            self.chunks[n].prev = Some(new_id);
        } else {
            self.last = new_id;
        }
        self.by_end.insert(index, id);
        self.by_start.insert(index, new_id);
        self.by_end.insert(self.chunks[new_id].end, new_id);
    }

    pub fn to_string(&self) -> String {
        let mut out = self.intro.clone();
        let mut cursor = Some(self.first);
        while let Some(id) = cursor {
            let chunk = &self.chunks[id];
            out.push_str(&chunk.intro);
            match &chunk.content {
                Some(text) => out.push_str(text),
                None => out.push_str(&self.original[chunk.start..chunk.end]),
            }
            out.push_str(&chunk.outro);
            cursor = chunk.next;
        }
        out.push_str(&self.outro);
        out
    }
}
