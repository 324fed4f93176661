//! SVG rendering of the wheel.
//!
//! Produces the same picture the terminal canvas approximates: rim disc,
//! one wedge per option, upright labels at the slice midpoints, and the
//! fixed pointer at 12 o'clock. Geometry comes entirely from [`crate::geometry`].

use crate::geometry;
use crate::wheel::WheelItem;
use std::fmt::Write;

/// Render the wheel at `rotation_deg` of clockwise rotation as a complete
/// SVG document in the 0..100 viewBox.
pub fn render(items: &[WheelItem], rotation_deg: f64) -> String {
    let n = items.len();
    let rotation = geometry::normalize_degrees(rotation_deg);
    let mut svg = String::with_capacity(1024 + 256 * n);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">"#
    );
    // Rim disc behind the slices.
    let _ = write!(
        svg,
        r##"<circle cx="50" cy="50" r="48" fill="white" stroke="#E5E7EB" stroke-width="4"/>"##
    );
    // The slices and labels turn together; the pointer stays put.
    let _ = write!(
        svg,
        r#"<g transform="rotate({rotation:.3} {c:.0} {c:.0})">"#,
        c = geometry::CENTER,
    );
    for (i, item) in items.iter().enumerate() {
        let path = geometry::slice_path(i, n);
        let _ = write!(
            svg,
            r#"<path d="{d}" fill="{fill}"/>"#,
            d = path.d(),
            fill = item.color.to_hex(),
        );
    }
    for (i, item) in items.iter().enumerate() {
        let label = geometry::label_placement(i, n);
        let _ = write!(
            svg,
            r#"<text x="{x:.3}" y="{y:.3}" text-anchor="middle" fill="white" font-weight="bold" font-size="{size:.2}" transform="rotate({rot:.3} {x:.3} {y:.3})">{text}</text>"#,
            x = label.x,
            y = label.y,
            size = label.font_size,
            rot = label.rotation,
            text = xml_escape(&item.label),
        );
    }
    svg.push_str("</g>");
    // Pointer wedge over the rim at the winning position.
    svg.push_str(r##"<path d="M 46 0 L 54 0 L 50 10 Z" fill="#333333"/>"##);
    svg.push_str("</svg>");
    svg
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::Wheel;

    #[test]
    fn one_wedge_and_label_per_option() {
        let wheel = Wheel::from_labels(["a", "b", "c"]).unwrap();
        let svg = render(wheel.items(), 0.0);
        assert_eq!(svg.matches("<path d=\"M 50.000").count(), 3);
        assert_eq!(svg.matches("<text").count(), 3);
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn rotation_is_normalized_into_the_transform() {
        let wheel = Wheel::default();
        let svg = render(wheel.items(), 360.0 * 6.0 + 90.0);
        assert!(svg.contains(r#"transform="rotate(90.000 50 50)""#));
    }

    #[test]
    fn labels_are_escaped() {
        let wheel = Wheel::from_labels(["Fish & Chips", "<Tag>"]).unwrap();
        let svg = render(wheel.items(), 0.0);
        assert!(svg.contains("Fish &amp; Chips"));
        assert!(svg.contains("&lt;Tag&gt;"));
    }

    #[test]
    fn wedges_use_palette_fills() {
        let wheel = Wheel::from_labels(["a", "b"]).unwrap();
        let svg = render(wheel.items(), 0.0);
        assert!(svg.contains(r##"fill="#FF3131""##));
        assert!(svg.contains(r##"fill="#FF1493""##));
    }
}
