use crate::ops::{Effect, StyleOp, Transform};

/// Best-effort media operations on the banner video. The host performs them
/// and reports failures back through [`HeroFlow::media_failed`]; they are
/// never retried and never surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaOp {
    RequestFullscreen,
    Play,
    Pause,
}

/// Drives the parallax hero video: a first trusted pointer gesture arms
/// fullscreen, a deep-enough scroll triggers the smooth-scroll/fullscreen/
/// playback sequence once, and leaving fullscreen pauses playback and parks
/// the viewport at one screen height.
#[derive(Debug, Default)]
pub struct HeroFlow {
    gesture_ready: bool,
    triggered: bool,
    has_played: bool,
    awaiting_scroll_end: bool,
}

impl HeroFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the first trusted pointer gesture; later calls are no-ops.
    pub fn pointer_gesture(&mut self) {
        self.gesture_ready = true;
    }

    /// Direct click on the video: fullscreen immediately, playback 1ms later.
    pub fn video_clicked(&mut self) -> Vec<Effect> {
        self.has_played = true;
        vec![
            Effect::Media(MediaOp::RequestFullscreen),
            Effect::defer(1, vec![Effect::Media(MediaOp::Play)]),
        ]
    }

    /// Scroll observation while the trigger is still armed. Fires at most
    /// once, and only between 200px of scroll and the upper half of the page.
    pub fn on_scroll(&mut self, scroll_y: f64, inner_height: f64, page_height: f64) -> Vec<Effect> {
        if self.triggered
            || scroll_y <= 200.0
            || self.has_played
            || scroll_y + inner_height / 2.0 > page_height / 2.0
        {
            return Vec::new();
        }

        self.triggered = true;
        self.awaiting_scroll_end = true;
        vec![Effect::ScrollTo {
            top: inner_height,
            smooth: true,
        }]
    }

    /// Called on every scroll event after the smooth scroll was issued; once
    /// the viewport settles at one screen height the media sequence starts.
    pub fn on_scroll_settled(&mut self, scroll_y: f64, inner_height: f64) -> Vec<Effect> {
        if !self.awaiting_scroll_end || (scroll_y - inner_height).abs() >= 2.0 {
            return Vec::new();
        }
        self.awaiting_scroll_end = false;

        let mut out = Vec::new();
        if self.gesture_ready {
            out.push(Effect::Media(MediaOp::RequestFullscreen));
        } else {
            tracing::warn!("fullscreen blocked: no user gesture detected");
        }
        out.push(Effect::defer(1, vec![Effect::Media(MediaOp::Play)]));
        out
    }

    /// Fullscreen state change. Leaving fullscreen pauses the video and
    /// restores the viewport to one screen height.
    pub fn fullscreen_changed(&mut self, is_fullscreen: bool, inner_height: f64) -> Vec<Effect> {
        if is_fullscreen {
            return Vec::new();
        }
        vec![
            Effect::Media(MediaOp::Pause),
            Effect::ScrollTo {
                top: inner_height,
                smooth: false,
            },
        ]
    }

    /// Log-only failure policy: the UI state is not rolled back and nothing
    /// is retried.
    pub fn media_failed(&self, op: MediaOp, error: &str) {
        match op {
            MediaOp::RequestFullscreen => tracing::warn!(error, "fullscreen request failed"),
            MediaOp::Play => tracing::warn!(error, "video playback failed"),
            MediaOp::Pause => tracing::warn!(error, "video pause failed"),
        }
    }
}

/// The closing slide strip. An external timer calls [`SlideCarousel::advance`]
/// every few seconds; advances are dropped while the strip is off screen.
#[derive(Debug)]
pub struct SlideCarousel {
    current: usize,
    count: usize,
}

impl SlideCarousel {
    pub fn new(count: usize) -> Self {
        Self { current: 0, count }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn advance(&mut self, visible: bool) -> Vec<Effect> {
        if !visible || self.count == 0 {
            return Vec::new();
        }
        self.current = (self.current + 1) % self.count;
        vec![Effect::style(StyleOp::Transform {
            target: "slide-wrapper",
            value: Transform::SlideX {
                percent: -(self.current as f32) * 100.0,
            },
        })]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_trigger_requires_depth_and_upper_half() {
        let mut hero = HeroFlow::new();
        // Not deep enough.
        assert!(hero.on_scroll(150.0, 1000.0, 6000.0).is_empty());
        // Past the midpoint of the page.
        assert!(hero.on_scroll(2800.0, 1000.0, 6000.0).is_empty());
        // In the window: smooth scroll issued once.
        let effects = hero.on_scroll(300.0, 1000.0, 6000.0);
        assert!(matches!(
            effects[0],
            Effect::ScrollTo { top, smooth: true } if top == 1000.0
        ));
        // Armed only once.
        assert!(hero.on_scroll(300.0, 1000.0, 6000.0).is_empty());
    }

    #[test]
    fn settle_without_gesture_skips_fullscreen_but_plays() {
        let mut hero = HeroFlow::new();
        hero.on_scroll(300.0, 1000.0, 6000.0);
        let effects = hero.on_scroll_settled(1000.5, 1000.0);
        assert!(!effects
            .iter()
            .any(|effect| matches!(effect, Effect::Media(MediaOp::RequestFullscreen))));
        assert!(effects.iter().any(|effect| matches!(
            effect,
            Effect::Defer { effects, .. }
                if matches!(effects[0], Effect::Media(MediaOp::Play))
        )));
    }

    #[test]
    fn settle_with_gesture_requests_fullscreen_first() {
        let mut hero = HeroFlow::new();
        hero.pointer_gesture();
        hero.on_scroll(300.0, 1000.0, 6000.0);
        // Still 50px away from the settle point: nothing yet.
        assert!(hero.on_scroll_settled(950.0, 1000.0).is_empty());
        let effects = hero.on_scroll_settled(999.0, 1000.0);
        assert!(matches!(
            effects[0],
            Effect::Media(MediaOp::RequestFullscreen)
        ));
    }

    #[test]
    fn leaving_fullscreen_pauses_and_restores_scroll() {
        let mut hero = HeroFlow::new();
        assert!(hero.fullscreen_changed(true, 1000.0).is_empty());
        let effects = hero.fullscreen_changed(false, 1000.0);
        assert!(matches!(effects[0], Effect::Media(MediaOp::Pause)));
        assert!(matches!(
            effects[1],
            Effect::ScrollTo { top, smooth: false } if top == 1000.0
        ));
    }

    #[test]
    fn played_video_disarms_scroll_trigger() {
        let mut hero = HeroFlow::new();
        hero.video_clicked();
        assert!(hero.on_scroll(300.0, 1000.0, 6000.0).is_empty());
    }

    #[test]
    fn carousel_wraps_and_skips_while_hidden() {
        let mut carousel = SlideCarousel::new(3);
        assert!(carousel.advance(false).is_empty());
        assert_eq!(carousel.current(), 0);

        carousel.advance(true);
        carousel.advance(true);
        let effects = carousel.advance(true);
        assert_eq!(carousel.current(), 0);
        assert!(matches!(
            effects[0],
            Effect::Style(StyleOp::Transform {
                target: "slide-wrapper",
                value: Transform::SlideX { percent },
            }) if percent == 0.0
        ));
    }
}
