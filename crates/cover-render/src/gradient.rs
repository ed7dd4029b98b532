//! Background geometry shared by the live preview, the SVG export, and the
//! raster export.
//!
//! Two radial glows sit over a solid base. Glow 1 is centred at (85%, 20%)
//! in `c1` starting at alpha 0.7; glow 2 at (15%, 80%) in `c2` starting at
//! alpha 0.6. Both fade to transparent at a radius measured in canvas units
//! (40% and 50% of the shorter canvas side), so every projection draws the
//! same pixels.

use cover_core::{Background, Color};
use kurbo::Point;

use crate::num;

/// One radial glow, fading linearly from `alpha` at `center` to 0 at `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGlow {
    pub color: Color,
    pub alpha: f64,
    pub center: Point,
    pub radius: f64,
    /// Centre as canvas percentages, for CSS.
    pub center_pct: (f64, f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundGradients {
    pub width: f64,
    pub height: f64,
    pub base: Color,
    pub glows: [RadialGlow; 2],
}

impl BackgroundGradients {
    pub fn for_canvas(width: u32, height: u32, background: &Background) -> Self {
        let (w, h) = (f64::from(width), f64::from(height));
        let short = w.min(h);
        let glow = |color: Color, alpha: f64, px: f64, py: f64, r: f64| RadialGlow {
            color,
            alpha,
            center: Point::new(w * px, h * py),
            radius: short * r,
            center_pct: (px * 100.0, py * 100.0),
        };
        Self {
            width: w,
            height: h,
            base: background.c3,
            glows: [
                glow(background.c1, 0.7, 0.85, 0.2, 0.4),
                glow(background.c2, 0.6, 0.15, 0.8, 0.5),
            ],
        }
    }

    /// `background-image` value for the preview surface.
    pub fn to_css(&self) -> String {
        self.glows
            .iter()
            .map(|g| {
                format!(
                    "radial-gradient(circle at {}% {}%, {} 0px, {} {}px)",
                    num(g.center_pct.0),
                    num(g.center_pct.1),
                    g.color.to_rgba_css(g.alpha),
                    g.color.to_rgba_css(0.0),
                    num(g.radius),
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn glow_geometry_uses_shorter_side() {
        let g = BackgroundGradients::for_canvas(980, 320, &Background::default());
        assert_eq!(g.glows[0].center, Point::new(833.0, 64.0));
        assert_eq!(g.glows[0].radius, 128.0);
        assert_eq!(g.glows[1].center, Point::new(147.0, 256.0));
        assert_eq!(g.glows[1].radius, 160.0);
        assert_eq!(g.base.to_hex(), "#f8f9fa");
    }

    #[test]
    fn css_matches_geometry() {
        let g = BackgroundGradients::for_canvas(1080, 1080, &Background::default());
        assert_eq!(
            g.to_css(),
            "radial-gradient(circle at 85% 20%, rgba(219, 234, 254, 0.7) 0px, rgba(219, 234, 254, 0) 432px), \
             radial-gradient(circle at 15% 80%, rgba(243, 232, 255, 0.6) 0px, rgba(243, 232, 255, 0) 540px)"
        );
    }
}
