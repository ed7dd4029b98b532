//! Browser export: run the raster plan on an offscreen Canvas2D, and
//! trigger downloads.

use std::collections::HashMap;

use cover_core::Document;
use cover_render::{RasterFormat, RasterOp, raster_plan};
use kurbo::Rect;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement, HtmlImageElement};

use crate::dom;

/// Decoded image elements by data URL, so exports can draw synchronously.
#[derive(Default)]
pub struct ImageCache {
    images: HashMap<String, HtmlImageElement>,
}

impl ImageCache {
    /// Start decoding `src` if it is not cached yet.
    pub fn preload(&mut self, src: &str) -> Result<(), JsValue> {
        if src.is_empty() || self.images.contains_key(src) {
            return Ok(());
        }
        let img = HtmlImageElement::new()?;
        img.set_src(src);
        self.images.insert(src.to_string(), img);
        Ok(())
    }

    pub fn preload_document(&mut self, doc: &Document) -> Result<(), JsValue> {
        for img in &doc.images {
            self.preload(&img.src)?;
        }
        Ok(())
    }

    /// Forget images no layer uses any more.
    pub fn retain_document(&mut self, doc: &Document) {
        self.images
            .retain(|src, _| doc.images.iter().any(|i| &i.src == src));
    }

    fn ready(&self, src: &str) -> Option<&HtmlImageElement> {
        self.images
            .get(src)
            .filter(|img| img.complete() && img.natural_width() > 0)
    }
}

/// Source rectangle that fills `dest` like `background-size: cover`:
/// scale to cover, crop the overflow evenly.
pub fn cover_source(natural_w: f64, natural_h: f64, dest: Rect) -> Rect {
    let (dw, dh) = (dest.width(), dest.height());
    if natural_w <= 0.0 || natural_h <= 0.0 || dw <= 0.0 || dh <= 0.0 {
        return Rect::new(0.0, 0.0, natural_w.max(0.0), natural_h.max(0.0));
    }
    let scale = (dw / natural_w).max(dh / natural_h);
    let (sw, sh) = (dw / scale, dh / scale);
    let sx = (natural_w - sw) / 2.0;
    let sy = (natural_h - sh) / 2.0;
    Rect::from_origin_size((sx, sy), (sw, sh))
}

fn context(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("not a 2d context"))
}

fn run_op(
    ctx: &CanvasRenderingContext2d,
    op: &RasterOp,
    images: &ImageCache,
) -> Result<(), JsValue> {
    match op {
        RasterOp::FillRect { rect, color } => {
            ctx.set_fill_style_str(&color.to_hex());
            ctx.fill_rect(rect.x0, rect.y0, rect.width(), rect.height());
        }
        RasterOp::RadialFill { rect, glow } => {
            let (cx, cy) = (glow.center.x, glow.center.y);
            let gradient = ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, glow.radius)?;
            gradient.add_color_stop(0.0, &glow.color.to_rgba_css(glow.alpha))?;
            gradient.add_color_stop(1.0, &glow.color.to_rgba_css(0.0))?;
            ctx.set_fill_style_canvas_gradient(&gradient);
            ctx.fill_rect(rect.x0, rect.y0, rect.width(), rect.height());
        }
        RasterOp::FillText {
            x,
            y,
            font,
            color,
            text,
        } => {
            ctx.set_font(font);
            ctx.set_fill_style_str(color);
            ctx.set_text_baseline("top");
            ctx.fill_text(text, *x, *y)?;
        }
        RasterOp::DrawImage { rect, src } => match images.ready(src) {
            Some(img) => {
                let source = cover_source(
                    f64::from(img.natural_width()),
                    f64::from(img.natural_height()),
                    *rect,
                );
                ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    img,
                    source.x0,
                    source.y0,
                    source.width(),
                    source.height(),
                    rect.x0,
                    rect.y0,
                    rect.width(),
                    rect.height(),
                )?;
            }
            None => log::warn!("image not decoded yet, skipped in export"),
        },
    }
    Ok(())
}

/// Paint the document on an offscreen canvas and return its data URL.
pub fn raster_data_url(
    doc: &Document,
    format: RasterFormat,
    quality: f64,
    images: &ImageCache,
) -> Result<String, JsValue> {
    let document = dom::document()?;
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str("not a canvas"))?;
    canvas.set_width(doc.width);
    canvas.set_height(doc.height);
    let ctx = context(&canvas)?;

    let plan = raster_plan(doc);
    log::debug!("painting {} raster ops", plan.len());
    for op in &plan {
        run_op(&ctx, op, images)?;
    }

    match format {
        RasterFormat::Png => canvas.to_data_url_with_type(format.mime()),
        RasterFormat::Jpeg => {
            canvas.to_data_url_with_type_and_encoder_options(format.mime(), &JsValue::from_f64(quality))
        }
    }
}

pub fn svg_data_url(svg: &str) -> String {
    let encoded: String = js_sys::encode_uri_component(svg).into();
    format!("data:image/svg+xml;charset=utf-8,{encoded}")
}

/// Save `url` under `file_name` through a temporary anchor.
pub fn download(url: &str, file_name: &str) -> Result<(), JsValue> {
    let document = dom::document()?;
    let anchor = document
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| JsValue::from_str("not an anchor"))?;
    anchor.set_href(url);
    anchor.set_download(file_name);
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;
    body.append_child(&anchor)?;
    anchor.click();
    anchor.remove();
    Ok(())
}
