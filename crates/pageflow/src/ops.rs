use std::time::Duration;

use crate::hero::MediaOp;

/// Fixed element identifier (id or class hook) the host resolves on its page.
pub type Target = &'static str;

/// CSS `display` values the flows toggle between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    None,
    Block,
    Flex,
}

/// Structured transforms; the host renders these into CSS transform strings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Rotate { degrees: f32 },
    /// `translateX(-50%) translateY(..px) scale(..)` on the parallax star.
    Parallax { translate_y: f32, scale: f32 },
    /// Horizontal slide of a carousel strip, in percent of its width.
    SlideX { percent: f32 },
}

/// One style mutation on a single element.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleOp {
    Opacity { target: Target, value: f32 },
    Display { target: Target, value: Display },
    Visibility { target: Target, hidden: bool },
    Transform { target: Target, value: Transform },
    /// Absolute offset as CSS calc/viewport text the host applies verbatim.
    Top { target: Target, value: &'static str },
    /// Element height as CSS calc/viewport text the host applies verbatim.
    Height { target: Target, value: &'static str },
    Transition { target: Target, value: &'static str },
    AddClass { target: Target, class: &'static str },
    RemoveClass { target: Target, class: &'static str },
}

/// A command emitted by a flow for the host to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Style(StyleOp),
    /// Apply the nested effects once the delay has elapsed.
    Defer { after: Duration, effects: Vec<Effect> },
    /// Navigate to a sibling document after the given delay.
    Navigate { href: &'static str, after: Duration },
    /// Retarget the donut chart's foreground arc.
    Donut {
        fraction: f32,
        fill: &'static str,
        duration: Duration,
    },
    /// Reveal text one character at a time at the given cadence.
    Typewriter { target: Target, char_interval: Duration },
    /// Scroll the viewport to the given vertical offset.
    ScrollTo { top: f64, smooth: bool },
    /// Best-effort media operation; failures are reported back and logged only.
    Media(MediaOp),
}

impl Effect {
    /// Convenience wrapper, keeps call sites at one line per mutation.
    pub(crate) fn style(op: StyleOp) -> Self {
        Effect::Style(op)
    }

    pub(crate) fn defer(after_ms: u64, effects: Vec<Effect>) -> Self {
        Effect::Defer {
            after: Duration::from_millis(after_ms),
            effects,
        }
    }
}
