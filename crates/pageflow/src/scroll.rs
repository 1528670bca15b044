use crate::ops::{Display, Effect, StyleOp, Transform};

/// Viewport geometry sampled by the host on every scroll observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_y: f64,
    pub inner_height: f64,
    /// Full document height, the maximum of the body/root scroll extents.
    pub page_height: f64,
    /// Layout rect of the parallax holder, when that section exists.
    pub star_holder: Option<HolderRect>,
}

/// Viewport-relative rect of an element, as `getBoundingClientRect` reports it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HolderRect {
    pub top: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(scroll_y: f64, inner_height: f64, page_height: f64) -> Self {
        Self {
            scroll_y,
            inner_height,
            page_height,
            star_holder: None,
        }
    }

    fn at_bottom(&self) -> bool {
        self.scroll_y + self.inner_height >= self.page_height
    }
}

/// Scroll fraction at which the parallax star locks to the viewport.
const STAR_SPEED: f64 = 0.3;
/// Pixels above the bottom at which the last-slides panel hides again.
const LAST_SLIDES_SLACK: f64 = 80.0;

/// Threshold-driven scroll visuals: menu fade, screw rotation, star parallax,
/// and the bottom-of-page reveals. One instance per page session.
#[derive(Debug, Default)]
pub struct ScrollEffects {
    reached_bottom: bool,
    last_slides_shown: bool,
}

impl ScrollEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the session has ever hit the bottom of the page.
    pub fn reached_bottom(&self) -> bool {
        self.reached_bottom
    }

    /// Processes one scroll observation and returns the style mutations to
    /// apply. Unconditional effects (menu, screw) are re-emitted on every
    /// observation; the host assigns them idempotently.
    pub fn observe(&mut self, view: Viewport) -> Vec<Effect> {
        let mut out = Vec::new();

        // Menu fades out past 200px of scroll and back in above it.
        out.push(Effect::style(StyleOp::Transition {
            target: "menu",
            value: "opacity 0.5s ease",
        }));
        out.push(Effect::style(StyleOp::Opacity {
            target: "menu",
            value: if view.scroll_y > 200.0 { 0.0 } else { 1.0 },
        }));

        out.push(Effect::style(StyleOp::Transform {
            target: "screw",
            value: Transform::Rotate {
                degrees: screw_rotation(view.scroll_y, view.inner_height),
            },
        }));

        if let Some(holder) = view.star_holder {
            if let Some(effects) = star_parallax(&view, holder) {
                out.extend(effects);
            }
        }

        if view.at_bottom() {
            out.push(Effect::style(StyleOp::AddClass {
                target: "credits",
                class: "faded",
            }));
            self.reached_bottom = true;
        }

        out.extend(self.last_slides(&view));
        out
    }

    // The panel fades in at the very bottom and only fades back out once the
    // viewport has moved more than the slack distance above it.
    fn last_slides(&mut self, view: &Viewport) -> Vec<Effect> {
        if !self.last_slides_shown && view.at_bottom() {
            self.last_slides_shown = true;
            return vec![
                Effect::style(StyleOp::Display {
                    target: "last-slides",
                    value: Display::Flex,
                }),
                Effect::style(StyleOp::Transition {
                    target: "last-slides",
                    value: "opacity 0.8s ease",
                }),
                Effect::style(StyleOp::Opacity {
                    target: "last-slides",
                    value: 1.0,
                }),
            ];
        }

        if self.last_slides_shown
            && view.scroll_y + view.inner_height < view.page_height - LAST_SLIDES_SLACK
        {
            self.last_slides_shown = false;
            return vec![
                Effect::style(StyleOp::Transition {
                    target: "last-slides",
                    value: "opacity 0.5s ease",
                }),
                Effect::style(StyleOp::Opacity {
                    target: "last-slides",
                    value: 0.0,
                }),
                Effect::defer(
                    500,
                    vec![Effect::style(StyleOp::Display {
                        target: "last-slides",
                        value: Display::None,
                    })],
                ),
            ];
        }

        Vec::new()
    }
}

/// Screw rotation ramps from 0 to 360 degrees between two and three viewport
/// heights of scroll and is pinned outside that band.
fn screw_rotation(scroll_y: f64, inner_height: f64) -> f32 {
    let start = 2.0 * inner_height;
    let end = 3.0 * inner_height;
    if scroll_y <= start {
        return 0.0;
    }
    let progress = ((scroll_y - start) / (end - start)).min(1.0);
    (progress * 360.0) as f32
}

fn star_parallax(view: &Viewport, holder: HolderRect) -> Option<Vec<Effect>> {
    let bottom = holder.top + holder.height;
    // Only while some part of the holder is in view.
    if holder.top >= view.inner_height || bottom <= 0.0 {
        return None;
    }

    let progress = (1.0 - holder.top / view.inner_height).clamp(0.0, 1.0);
    Some(vec![
        Effect::style(StyleOp::Transform {
            target: "star",
            value: Transform::Parallax {
                translate_y: (progress * holder.height * STAR_SPEED) as f32,
                scale: (1.0 + 2.0 * progress) as f32,
            },
        }),
        Effect::style(StyleOp::Opacity {
            target: "star",
            value: (1.0 - progress) as f32,
        }),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu_opacity(effects: &[Effect]) -> Option<f32> {
        effects.iter().find_map(|effect| match effect {
            Effect::Style(StyleOp::Opacity {
                target: "menu",
                value,
            }) => Some(*value),
            _ => None,
        })
    }

    #[test]
    fn menu_fades_past_threshold_and_returns() {
        let mut scroll = ScrollEffects::new();
        let at = |y: f64| Viewport::new(y, 900.0, 5000.0);

        assert_eq!(menu_opacity(&scroll.observe(at(0.0))), Some(1.0));
        assert_eq!(menu_opacity(&scroll.observe(at(250.0))), Some(0.0));
        assert_eq!(menu_opacity(&scroll.observe(at(100.0))), Some(1.0));
    }

    #[test]
    fn screw_rotation_ramps_between_two_and_three_viewports() {
        assert_eq!(screw_rotation(0.0, 1000.0), 0.0);
        assert_eq!(screw_rotation(2000.0, 1000.0), 0.0);
        assert_eq!(screw_rotation(2500.0, 1000.0), 180.0);
        assert_eq!(screw_rotation(3000.0, 1000.0), 360.0);
        assert_eq!(screw_rotation(9000.0, 1000.0), 360.0);
    }

    #[test]
    fn star_parallax_only_while_holder_in_view() {
        let mut view = Viewport::new(0.0, 1000.0, 5000.0);
        view.star_holder = Some(HolderRect {
            top: 1200.0,
            height: 600.0,
        });
        assert!(star_parallax(&view, view.star_holder.unwrap()).is_none());

        view.star_holder = Some(HolderRect {
            top: 500.0,
            height: 600.0,
        });
        let effects = star_parallax(&view, view.star_holder.unwrap()).unwrap();
        match &effects[0] {
            Effect::Style(StyleOp::Transform {
                value: Transform::Parallax { translate_y, scale },
                ..
            }) => {
                // progress = 0.5 here
                assert!((translate_y - 90.0).abs() < 1e-4);
                assert!((scale - 2.0).abs() < 1e-4);
            }
            other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn last_slides_show_at_bottom_and_hide_with_slack() {
        let mut scroll = ScrollEffects::new();
        let bottom = Viewport::new(4100.0, 900.0, 5000.0);
        let effects = scroll.observe(bottom);
        assert!(effects.iter().any(|effect| matches!(
            effect,
            Effect::Style(StyleOp::Display {
                target: "last-slides",
                value: Display::Flex,
            })
        )));
        assert!(scroll.reached_bottom());

        // 50px above the bottom is within the slack; nothing hides yet.
        let near = Viewport::new(4050.0, 900.0, 5000.0);
        assert!(!scroll
            .observe(near)
            .iter()
            .any(|effect| matches!(effect, Effect::Defer { .. })));

        // Past the slack the panel fades out and is display:none after 500ms.
        let above = Viewport::new(3900.0, 900.0, 5000.0);
        let effects = scroll.observe(above);
        assert!(effects.iter().any(|effect| matches!(
            effect,
            Effect::Defer { after, .. } if after.as_millis() == 500
        )));
    }
}
