use std::time::Duration;

use crate::ops::{Display, Effect, StyleOp};

const SLIDE_TRANSITION: &str = "top 0.8s ease-out, opacity 0.8s ease-out";

/// Intro narrative: three page-wide clicks walk from the intro card through
/// two story sections and on to the stats page. The counter keeps running
/// past the final branch; later clicks do nothing.
#[derive(Debug, Default)]
pub struct IntroScene {
    clicks: u32,
}

impl IntroScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn click(&mut self) -> Vec<Effect> {
        self.clicks += 1;
        match self.clicks {
            1 => vec![
                Effect::style(StyleOp::AddClass {
                    target: "intro",
                    class: "transition-out",
                }),
                Effect::style(StyleOp::AddClass {
                    target: "intro",
                    class: "fade-out",
                }),
                Effect::defer(
                    501,
                    vec![
                        Effect::style(StyleOp::Display {
                            target: "s1",
                            value: Display::Block,
                        }),
                        Effect::style(StyleOp::AddClass {
                            target: "s1",
                            class: "visible",
                        }),
                        Effect::Typewriter {
                            target: "s1",
                            char_interval: Duration::from_millis(25),
                        },
                    ],
                ),
                // The continue link appears 2700ms after the section does.
                Effect::defer(
                    501 + 2700,
                    vec![Effect::style(StyleOp::AddClass {
                        target: "s1-anchor",
                        class: "visible",
                    })],
                ),
            ],
            2 => vec![
                Effect::style(StyleOp::RemoveClass {
                    target: "s1",
                    class: "visible",
                }),
                Effect::defer(
                    501,
                    vec![Effect::style(StyleOp::Display {
                        target: "s2",
                        value: Display::Block,
                    })],
                ),
            ],
            3 => vec![Effect::Navigate {
                href: "stats.html",
                after: Duration::from_millis(10),
            }],
            _ => Vec::new(),
        }
    }
}

/// Stats narrative: the donut chart winds down (39% → 12% → 8%) while stat
/// cards slide through, then the chart gives way to the gold-path section and
/// the closing table before navigating onward on the fifth click.
#[derive(Debug, Default)]
pub struct StatsScene {
    clicks: u32,
}

impl StatsScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    /// Effects to apply when the page opens: the donut eases from full to 39%.
    pub fn open(&self) -> Vec<Effect> {
        vec![Effect::Donut {
            fraction: 0.39,
            fill: "#FFF085",
            duration: Duration::from_millis(1500),
        }]
    }

    pub fn click(&mut self) -> Vec<Effect> {
        self.clicks += 1;
        match self.clicks {
            1 => {
                let mut out = slide_out("stat-1", "calc(0px - 800px)");
                out.extend(slide_in("stat-2", "calc(15vh - 150px)"));
                out.push(Effect::Donut {
                    fraction: 0.12,
                    fill: "#FCB454",
                    duration: Duration::from_millis(800),
                });
                out
            }
            2 => {
                let mut out = vec![Effect::Donut {
                    fraction: 0.08,
                    fill: "#F16767",
                    duration: Duration::from_millis(800),
                }];
                out.extend(slide_out("stat-2", "calc(0px - 600px)"));
                out.extend(slide_in("stat-3", "calc(0vh - 200px)"));
                out
            }
            3 => vec![
                Effect::style(StyleOp::Transition {
                    target: "container",
                    value: "opacity 0.8s ease-out",
                }),
                Effect::style(StyleOp::Opacity {
                    target: "container",
                    value: 0.0,
                }),
                Effect::defer(
                    800,
                    vec![
                        Effect::style(StyleOp::Display {
                            target: "container",
                            value: Display::None,
                        }),
                        Effect::style(StyleOp::Display {
                            target: "second",
                            value: Display::Block,
                        }),
                    ],
                ),
                Effect::defer(
                    810,
                    vec![
                        Effect::style(StyleOp::Transition {
                            target: "second",
                            value: "opacity 0.8s ease-in",
                        }),
                        Effect::style(StyleOp::Opacity {
                            target: "second",
                            value: 1.0,
                        }),
                    ],
                ),
            ],
            4 => vec![
                Effect::style(StyleOp::AddClass {
                    target: "piggy-tear",
                    class: "animate",
                }),
                Effect::style(StyleOp::Opacity {
                    target: "second",
                    value: 1.0,
                }),
                Effect::style(StyleOp::Transition {
                    target: "second",
                    value: "opacity 0.2s",
                }),
                Effect::defer(
                    400,
                    vec![
                        Effect::style(StyleOp::Opacity {
                            target: "second",
                            value: 0.0,
                        }),
                        Effect::style(StyleOp::Display {
                            target: "container",
                            value: Display::None,
                        }),
                        Effect::style(StyleOp::Visibility {
                            target: "container",
                            hidden: true,
                        }),
                        Effect::style(StyleOp::Display {
                            target: "pie-stats",
                            value: Display::None,
                        }),
                        Effect::style(StyleOp::Visibility {
                            target: "pie-stats",
                            hidden: true,
                        }),
                        Effect::style(StyleOp::Display {
                            target: "donut-chart",
                            value: Display::None,
                        }),
                        Effect::style(StyleOp::Visibility {
                            target: "donut-chart",
                            hidden: true,
                        }),
                    ],
                ),
                Effect::defer(
                    600,
                    vec![Effect::style(StyleOp::Display {
                        target: "second",
                        value: Display::None,
                    })],
                ),
                Effect::defer(
                    800,
                    vec![
                        Effect::style(StyleOp::Display {
                            target: "third-table",
                            value: Display::Block,
                        }),
                        Effect::style(StyleOp::AddClass {
                            target: "third-table",
                            class: "fadeIn",
                        }),
                    ],
                ),
            ],
            5 => vec![Effect::Navigate {
                href: "psa.html",
                after: Duration::from_millis(10),
            }],
            _ => Vec::new(),
        }
    }
}

fn slide_out(target: &'static str, top: &'static str) -> Vec<Effect> {
    vec![
        Effect::style(StyleOp::Transition {
            target,
            value: SLIDE_TRANSITION,
        }),
        Effect::style(StyleOp::Top { target, value: top }),
        Effect::style(StyleOp::Opacity {
            target,
            value: 0.0,
        }),
    ]
}

fn slide_in(target: &'static str, top: &'static str) -> Vec<Effect> {
    vec![
        Effect::style(StyleOp::Display {
            target,
            value: Display::Block,
        }),
        Effect::style(StyleOp::Transition {
            target,
            value: SLIDE_TRANSITION,
        }),
        Effect::style(StyleOp::Top { target, value: top }),
        Effect::style(StyleOp::Opacity {
            target,
            value: 1.0,
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deferred<'a>(effects: &'a [Effect], ms: u128) -> &'a [Effect] {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::Defer { after, effects } if after.as_millis() == ms => {
                    Some(effects.as_slice())
                }
                _ => None,
            })
            .unwrap_or_else(|| panic!("no deferred batch at {ms}ms"))
    }

    #[test]
    fn intro_third_click_navigates_to_stats() {
        let mut scene = IntroScene::new();
        scene.click();
        scene.click();
        let effects = scene.click();
        assert!(effects.iter().any(|effect| matches!(
            effect,
            Effect::Navigate {
                href: "stats.html",
                ..
            }
        )));
        // Later clicks keep counting but change nothing.
        assert!(scene.click().is_empty());
        assert_eq!(scene.clicks(), 4);
    }

    #[test]
    fn intro_first_click_reveals_first_section_after_delay() {
        let mut scene = IntroScene::new();
        let effects = scene.click();
        let batch = deferred(&effects, 501);
        assert!(batch.iter().any(|effect| matches!(
            effect,
            Effect::Style(StyleOp::Display {
                target: "s1",
                value: Display::Block,
            })
        )));
        assert!(batch
            .iter()
            .any(|effect| matches!(effect, Effect::Typewriter { target: "s1", .. })));
    }

    #[test]
    fn donut_narrative_fractions_and_fills() {
        let mut scene = StatsScene::new();
        assert!(matches!(
            scene.open()[0],
            Effect::Donut {
                fraction,
                fill: "#FFF085",
                ..
            } if (fraction - 0.39).abs() < 1e-6
        ));

        let first = scene.click();
        assert!(first.iter().any(|effect| matches!(
            effect,
            Effect::Donut { fill: "#FCB454", .. }
        )));
        let second = scene.click();
        assert!(second.iter().any(|effect| matches!(
            effect,
            Effect::Donut { fill: "#F16767", .. }
        )));
    }

    #[test]
    fn stats_third_click_hides_container_and_reveals_second() {
        let mut scene = StatsScene::new();
        scene.click();
        scene.click();
        let effects = scene.click();

        assert!(effects.iter().any(|effect| matches!(
            effect,
            Effect::Style(StyleOp::Opacity {
                target: "container",
                value,
            }) if *value == 0.0
        )));

        let batch = deferred(&effects, 800);
        assert!(batch.iter().any(|effect| matches!(
            effect,
            Effect::Style(StyleOp::Display {
                target: "container",
                value: Display::None,
            })
        )));
        assert!(batch.iter().any(|effect| matches!(
            effect,
            Effect::Style(StyleOp::Display {
                target: "second",
                value: Display::Block,
            })
        )));
    }

    #[test]
    fn stats_fifth_click_schedules_navigation() {
        let mut scene = StatsScene::new();
        for _ in 0..4 {
            scene.click();
        }
        let effects = scene.click();
        assert!(effects.iter().any(|effect| matches!(
            effect,
            Effect::Navigate {
                href: "psa.html",
                after,
            } if after.as_millis() == 10
        )));
        assert!(scene.click().is_empty());
    }
}
