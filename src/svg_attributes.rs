//! SVG attribute value parsing.
//!
//! Every parser here is total: malformed input produces the attribute's
//! default and a `warn!`, so one bad attribute never aborts a render.

use crate::basics::{FillingRule, LineCap, LineJoin};
use crate::trans_affine::Transform;
use crate::trans_viewport::ViewBox;
use log::{trace, warn};

/// Split a list of numbers separated by whitespace and/or commas.
///
/// Returns `None` if any item is not a number.
pub fn parse_number_list(s: &str) -> Option<Vec<f64>> {
    s.split(|c: char| c == ',' || c.is_ascii_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<f64>().ok())
        .collect()
}

/// Parse a `viewBox` attribute: four numbers with a positive size.
pub fn parse_view_box(s: &str) -> ViewBox {
    let vb = parse_number_list(s)
        .filter(|v| v.len() == 4)
        .and_then(|v| ViewBox::new(v[0], v[1], v[2], v[3]));
    match vb {
        Some(vb) => vb,
        None => {
            warn!("malformed viewBox {:?}, using 0 0 100 100", s);
            ViewBox::DEFAULT
        }
    }
}

/// Parse a length that is unitless or in `px`.
pub fn parse_length(s: &str) -> Option<f32> {
    let s = s.trim();
    let num = s.strip_suffix("px").unwrap_or(s).trim_end();
    num.parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Parse a `stroke-width` attribute, falling back to 1.
pub fn parse_stroke_width(s: &str) -> f32 {
    match parse_length(s) {
        Some(w) if w >= 0.0 => w,
        _ => {
            warn!("malformed stroke-width {:?}, using 1", s);
            1.0
        }
    }
}

pub fn parse_line_cap(s: &str) -> LineCap {
    match s.trim() {
        "butt" => LineCap::Butt,
        "round" => LineCap::Round,
        "square" => LineCap::Square,
        other => {
            trace!("unknown stroke-linecap {:?}", other);
            LineCap::default()
        }
    }
}

pub fn parse_line_join(s: &str) -> LineJoin {
    match s.trim() {
        "miter" => LineJoin::Miter,
        "round" => LineJoin::Round,
        "bevel" => LineJoin::Bevel,
        other => {
            trace!("unknown stroke-linejoin {:?}", other);
            LineJoin::default()
        }
    }
}

/// Parse a `fill-rule` attribute. Unknown values give `None` so the caller's
/// default applies.
pub fn parse_fill_rule(s: &str) -> Option<FillingRule> {
    match s.trim() {
        "nonzero" => Some(FillingRule::NonZero),
        "evenodd" => Some(FillingRule::EvenOdd),
        other => {
            trace!("unknown fill-rule {:?}", other);
            None
        }
    }
}

// ============================================================================
// Transform lists
// ============================================================================

/// Parse a `transform` attribute.
///
/// Supports `translate(tx [ty])`, `scale(sx [sy])` and `rotate(deg)`,
/// composed in file order as SVG does: `scale(2) translate(5 5)` moves the
/// points first and then scales them. A function with bad arguments is skipped with
/// a warning; unknown functions are skipped silently.
pub fn parse_transform(s: &str) -> Transform {
    let mut t = Transform::new();
    let mut rest = s.trim();
    while !rest.is_empty() {
        let (Some(open), Some(close)) = (rest.find('('), rest.find(')')) else {
            warn!("unterminated transform {:?}", rest);
            break;
        };
        if close < open {
            warn!("malformed transform {:?}", rest);
            break;
        }
        let name = rest[..open].trim();
        let args = parse_number_list(&rest[open + 1..close]);
        apply_transform(&mut t, name, args.as_deref());
        rest = rest[close + 1..].trim_start_matches(|c: char| c == ',' || c.is_ascii_whitespace());
    }
    t
}

fn apply_transform(t: &mut Transform, name: &str, args: Option<&[f64]>) {
    let step = match (name, args) {
        ("translate", Some([tx])) => Transform::new_translation(*tx as f32, 0.0),
        ("translate", Some([tx, ty])) => Transform::new_translation(*tx as f32, *ty as f32),
        ("scale", Some([s])) => Transform::new_scaling(*s as f32, *s as f32),
        ("scale", Some([sx, sy])) => Transform::new_scaling(*sx as f32, *sy as f32),
        ("rotate", Some([deg])) => Transform::new_rotation(*deg as f32),
        ("translate" | "scale" | "rotate", _) => {
            warn!("malformed {} arguments {:?}, ignored", name, args);
            return;
        }
        _ => {
            trace!("skipping unsupported transform {:?}", name);
            return;
        }
    };
    // Later functions in the list apply to the points first.
    t.premultiply(&step);
}

// ============================================================================
// Tests
// ============================================================================
