//! SVG document driver.
//!
//! Walks the flat element list of an icon document in order and paints
//! each shape onto one output image:
//!
//! - `<svg>` sets up the view box (or `0 0 width height` without one),
//! - `<path>`, `<rect>`, `<circle>` and `<ellipse>` are filled into a
//!   scratch layer that is composited onto the output, then stroked
//!   directly onto the output,
//! - everything else is skipped.
//!
//! Supersampling renders at a multiple of the requested size and resamples
//! the result down, which is where fills get their anti-aliasing.

use crate::basics::{FillingRule, LineCap, LineJoin};
use crate::color::{is_paint_none, parse_color, Rgba8};
use crate::comp_op::composite_layer;
use crate::conv_polygon::build_polygons;
use crate::ellipse::{circle_to_path, ellipse_to_path};
use crate::error::{RasterError, Result};
use crate::image_filters::{resample_with, ResampleFilter};
use crate::path_storage::parse_path_data;
use crate::rasterizer_scanline::fill_polygons;
use crate::renderer_outline_aa::{stroke_path, CapPlacement};
use crate::rendering_buffer::RasterizedImage;
use crate::rounded_rect::rect_to_path;
use crate::svg_attributes::{
    parse_fill_rule, parse_length, parse_line_cap, parse_line_join, parse_stroke_width,
    parse_transform, parse_view_box,
};
use crate::svg_xml::{parse_elements, SvgElement};
use crate::trans_affine::Transform;
use crate::trans_viewport::{RasterContext, ViewBox};
use log::{debug, trace, warn};
use std::path::Path;

/// Document size assumed when `<svg>` has no usable `width`/`height`.
pub const DEFAULT_DOCUMENT_SIZE: f32 = 16.0;

// ============================================================================
// RenderOptions
// ============================================================================

/// Knobs for one rasterization call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    fill_rule: FillingRule,
    cap_placement: CapPlacement,
    supersample: u32,
    filter: ResampleFilter,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self {
            fill_rule: FillingRule::EvenOdd,
            cap_placement: CapPlacement::EverySegment,
            supersample: 2,
            filter: ResampleFilter::Box,
        }
    }

    /// Fill rule for elements without a `fill-rule` attribute.
    pub fn set_fill_rule(&mut self, rule: FillingRule) -> &mut Self {
        self.fill_rule = rule;
        self
    }

    pub fn set_cap_placement(&mut self, placement: CapPlacement) -> &mut Self {
        self.cap_placement = placement;
        self
    }

    /// Linear supersampling factor; values below 1 are raised to 1.
    pub fn set_supersample(&mut self, factor: u32) -> &mut Self {
        self.supersample = factor.max(1);
        self
    }

    pub fn set_filter(&mut self, filter: ResampleFilter) -> &mut Self {
        self.filter = filter;
        self
    }

    pub fn fill_rule(&self) -> FillingRule {
        self.fill_rule
    }

    pub fn cap_placement(&self) -> CapPlacement {
        self.cap_placement
    }

    pub fn supersample(&self) -> u32 {
        self.supersample
    }

    pub fn filter(&self) -> ResampleFilter {
        self.filter
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// PathStyle
// ============================================================================

/// Paint attributes of one shape element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStyle {
    pub fill_color: Rgba8,
    pub stroke_color: Rgba8,
    pub stroke_width: f32,
    pub has_fill: bool,
    pub has_stroke: bool,
    pub stroke_line_cap: LineCap,
    pub stroke_line_join: LineJoin,
    /// `fill-rule` attribute, if the element sets one.
    pub fill_rule: Option<FillingRule>,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            fill_color: Rgba8::BLACK,
            stroke_color: Rgba8::BLACK,
            stroke_width: 1.0,
            has_fill: true,
            has_stroke: false,
            stroke_line_cap: LineCap::Butt,
            stroke_line_join: LineJoin::Miter,
            fill_rule: None,
        }
    }
}

impl PathStyle {
    /// Read the presentation attributes of `el`.
    pub fn from_element(el: &SvgElement) -> Self {
        let mut style = Self::default();
        if let Some(fill) = el.attr("fill") {
            style.has_fill = !is_paint_none(fill);
            if style.has_fill {
                style.fill_color = parse_color(fill);
            }
        }
        if let Some(stroke) = el.attr("stroke") {
            style.has_stroke = !is_paint_none(stroke);
            if style.has_stroke {
                style.stroke_color = parse_color(stroke);
            }
        }
        if let Some(w) = el.attr("stroke-width") {
            style.stroke_width = parse_stroke_width(w);
        }
        if let Some(cap) = el.attr("stroke-linecap") {
            style.stroke_line_cap = parse_line_cap(cap);
        }
        if let Some(join) = el.attr("stroke-linejoin") {
            style.stroke_line_join = parse_line_join(join);
        }
        style.fill_rule = el.attr("fill-rule").and_then(parse_fill_rule);

        let opacity = opacity_attr(el, "opacity");
        style.fill_color = scale_alpha(style.fill_color, opacity * opacity_attr(el, "fill-opacity"));
        style.stroke_color =
            scale_alpha(style.stroke_color, opacity * opacity_attr(el, "stroke-opacity"));
        style
    }

    /// Returns `true` if the fill would paint anything.
    pub fn paints_fill(&self) -> bool {
        self.has_fill && !self.fill_color.is_transparent()
    }

    /// Returns `true` if the stroke would paint anything. A zero width still
    /// paints, since device widths are clamped to one pixel.
    pub fn paints_stroke(&self) -> bool {
        self.has_stroke && !self.stroke_color.is_transparent()
    }
}

/// An opacity attribute in `[0, 1]`, 1 when absent.
fn opacity_attr(el: &SvgElement, key: &str) -> f32 {
    match el.attr(key) {
        None => 1.0,
        Some(v) => match v.trim().parse::<f32>() {
            Ok(o) if o.is_finite() => o.clamp(0.0, 1.0),
            _ => {
                warn!("malformed {} {:?}, using 1", key, v);
                1.0
            }
        },
    }
}

fn scale_alpha(c: Rgba8, factor: f32) -> Rgba8 {
    if factor >= 1.0 {
        return c;
    }
    Rgba8::with_opacity(&c, c.alpha_with_coverage(factor))
}

// ============================================================================
// Element geometry
// ============================================================================

fn length_attr(el: &SvgElement, key: &str) -> Option<f32> {
    el.attr(key).and_then(parse_length)
}

/// Path data for a shape element, `None` for non-shapes.
fn element_path_data(el: &SvgElement) -> Option<String> {
    let num = |key: &str| length_attr(el, key).unwrap_or(0.0);
    match el.name.as_str() {
        "path" => Some(el.attr("d").unwrap_or_default().to_string()),
        "rect" => Some(rect_to_path(
            num("x"),
            num("y"),
            num("width"),
            num("height"),
            length_attr(el, "rx"),
            length_attr(el, "ry"),
        )),
        "circle" => Some(circle_to_path(num("cx"), num("cy"), num("r"))),
        "ellipse" => Some(ellipse_to_path(num("cx"), num("cy"), num("rx"), num("ry"))),
        _ => None,
    }
}

/// View box declared by the `<svg>` element.
fn document_view_box(el: &SvgElement) -> ViewBox {
    if let Some(vb) = el.attr("viewBox") {
        return parse_view_box(vb);
    }
    let size = |key: &str| {
        length_attr(el, key)
            .filter(|v| *v > 0.0)
            .unwrap_or(DEFAULT_DOCUMENT_SIZE) as f64
    };
    ViewBox::new(0.0, 0.0, size("width"), size("height")).unwrap_or_default()
}

// ============================================================================
// Rendering
// ============================================================================

/// Render an element list at exactly `width` x `height`, without
/// supersampling.
pub fn render_elements(
    elements: &[SvgElement],
    width: u32,
    height: u32,
    options: &RenderOptions,
) -> Result<RasterizedImage> {
    if width == 0 || height == 0 {
        return Err(RasterError::InvalidSize { width, height });
    }
    let root = match elements.first() {
        Some(el) if el.name == "svg" => el,
        Some(el) => return Err(RasterError::UnsupportedElement(el.name.clone())),
        None => return Err(RasterError::UnsupportedElement(String::new())),
    };
    let view_box = document_view_box(root);
    debug!(
        "rendering {} elements at {}x{}, viewBox {:?}",
        elements.len(),
        width,
        height,
        view_box
    );

    let mut out = RasterizedImage::try_new(width, height)?;
    let mut layer: Option<RasterizedImage> = None;

    for el in &elements[1..] {
        let Some(d) = element_path_data(el) else {
            trace!("skipping <{}>", el.name);
            continue;
        };
        let commands = parse_path_data(&d);
        if commands.is_empty() {
            trace!("skipping <{}> without geometry", el.name);
            continue;
        }
        let style = PathStyle::from_element(el);
        let transform = el.attr("transform").map_or(Transform::new(), parse_transform);
        let ctx = RasterContext::new(width, height, view_box, transform);
        debug!(
            "<{}>: {} commands, fill {}, stroke {}",
            el.name,
            commands.len(),
            style.paints_fill(),
            style.paints_stroke()
        );

        if style.paints_fill() {
            let polygons = build_polygons(&commands, &ctx);
            // Same size as `out`, which was allocated successfully.
            let scratch = layer.get_or_insert_with(|| RasterizedImage::new(width, height));
            scratch.clear(Rgba8::TRANSPARENT);
            let rule = style.fill_rule.unwrap_or(options.fill_rule);
            fill_polygons(scratch, &polygons, &style.fill_color, rule);
            composite_layer(&mut out, scratch)?;
        }

        if style.paints_stroke() {
            let device_width = (style.stroke_width * ctx.min_scale() * 0.5).max(1.0);
            stroke_path(
                &mut out,
                &commands,
                &ctx,
                style.stroke_color,
                device_width,
                style.stroke_line_cap,
                style.stroke_line_join,
                options.cap_placement,
            );
        }
    }
    Ok(out)
}

/// Render at `options.supersample()` times the requested size and resample
/// down to `width` x `height`.
pub fn render_supersampled(
    elements: &[SvgElement],
    width: u32,
    height: u32,
    options: &RenderOptions,
) -> Result<RasterizedImage> {
    if width == 0 || height == 0 {
        return Err(RasterError::InvalidSize { width, height });
    }
    let factor = options.supersample.max(1);
    if factor == 1 {
        return render_elements(elements, width, height, options);
    }
    let (Some(big_w), Some(big_h)) = (width.checked_mul(factor), height.checked_mul(factor)) else {
        return Err(RasterError::InvalidSize { width, height });
    };
    let big = render_elements(elements, big_w, big_h, options)?;
    Ok(resample_with(&big, width, height, options.filter))
}

/// Rasterize SVG source text.
pub fn rasterize_svg_str(
    source: &str,
    width: u32,
    height: u32,
    options: &RenderOptions,
) -> Result<RasterizedImage> {
    let elements = parse_elements(source)?;
    render_supersampled(&elements, width, height, options)
}

/// Read and rasterize an SVG file.
///
/// The file is read completely before rendering starts, so an I/O failure
/// never leaves a partially rendered image behind.
pub fn rasterize_file<P: AsRef<Path>>(
    path: P,
    width: u32,
    height: u32,
    options: &RenderOptions,
) -> Result<RasterizedImage> {
    let path = path.as_ref();
    debug!("rasterizing {} at {}x{}", path.display(), width, height);
    let source = std::fs::read_to_string(path)?;
    rasterize_svg_str(&source, width, height, options)
}

// ============================================================================
// Tests
// ============================================================================
