/// Tracks open composites to pick the text written after each element.
///
/// Each frame holds a single "finished" flag. `pop` marks the frame finished
/// and removes it in the same call, so the top frame is never a finished one
/// and `separator` only has to tell an open frame from the root.
#[derive(Debug, Default)]
pub struct NestingStack {
    frames: Vec<bool>,
}

impl NestingStack {
    pub fn push(&mut self) {
        self.frames.push(false);
    }

    /// Popping with no open frame does nothing.
    pub fn pop(&mut self) {
        if let Some(top) = self.frames.last_mut() {
            *top = true;
            self.frames.pop();
        }
    }

    /// `",\n"` inside an open composite, `"\n"` at the root.
    pub fn separator(&self) -> &'static str {
        if self.frames.last().is_some_and(|finished| !finished) {
            ",\n"
        } else {
            "\n"
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_has_no_comma() {
        let stack = NestingStack::default();
        assert_eq!(stack.separator(), "\n");
    }

    #[test]
    fn test_inside_frame_has_comma() {
        let mut stack = NestingStack::default();
        stack.push();
        assert_eq!(stack.separator(), ",\n");
        stack.push();
        stack.pop();
        assert_eq!(stack.separator(), ",\n");
        assert_eq!(stack.depth(), 1);
        stack.pop();
        assert_eq!(stack.separator(), "\n");
    }

    #[test]
    fn test_pop_on_empty_is_noop() {
        let mut stack = NestingStack::default();
        stack.pop();
        assert_eq!(stack.depth(), 0);
    }
}
