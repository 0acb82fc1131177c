use image::imageops::{FilterType, contrast, overlay, resize};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use thiserror::Error;

use crate::core::barcode::{BarcodeEncoder, BarcodeError, Code128Encoder};
use crate::core::color::{color_or, rgba, with_alpha};
use crate::core::profile::CardProfile;
use crate::core::sequence::preview_id;
use crate::render::assets::AssetSet;
use crate::render::background::paint_background;
use crate::render::draw::{diagonal_fade, fill_rounded_rect, overlay_with_opacity, with_blend};
use crate::render::surface::{BLEED, CARD_HEIGHT, CARD_WIDTH, SAFE, Surface};
use crate::render::text::{TextStyle, draw_text, fit_scale, title_case, wrap};

const W: i32 = CARD_WIDTH as i32;
const H: i32 = CARD_HEIGHT as i32;

const BRAND_STYLE: TextStyle = TextStyle::bold(7);
const TAGLINE_STYLE: TextStyle = TextStyle::bold(4);
const MEMBER_STYLE: TextStyle = TextStyle::bold(5);
const LABEL_STYLE: TextStyle = TextStyle::bold(2);
const BODY_STYLE: TextStyle = TextStyle::regular(2);

const MARK_SIZE: u32 = 100;
const BADGE_WIDTH: u32 = 600;
const BADGE_HEIGHT: u32 = 88;
const WATERMARK_WIDTH: u32 = 320;
const WATERMARK_OPACITY: f32 = 0.08;

const LEGAL_WIDTH: u32 = 480;
const LINE_HEIGHT: i32 = 22;
const PARAGRAPH_GAP: i32 = 4;
const INFO_PANEL_HEIGHT: u32 = 150;
const BARCODE_WIDTH: u32 = 420;
const BARCODE_HEIGHT: u32 = 68;
const BARCODE_CONTRAST: f32 = 40.0;
const CONTACT_WIDTH: u32 = 420;
const CONTACT_HEIGHT: u32 = 170;
const CONTACT_MARK_SIZE: u32 = 60;

const FALLBACK_PRIMARY: Rgba<u8> = Rgba([0x0f, 0x17, 0x2a, 0xff]);

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to encode barcode for '{identifier}': {source}")]
    Barcode {
        identifier: String,
        #[source]
        source: BarcodeError,
    },
}

/// Colors shared by both faces.
struct Palette {
    text: Rgba<u8>,
    tagline: Rgba<u8>,
    badge: Rgba<u8>,
    info_panel: Rgba<u8>,
    contact_panel: Rgba<u8>,
    guide: Rgba<u8>,
    gradient: Rgba<u8>,
}

impl Palette {
    fn for_profile(profile: &CardProfile) -> Self {
        let white = rgba(0xff, 0xff, 0xff, 0xff);
        let black = rgba(0x00, 0x00, 0x00, 0xff);
        let primary = color_or(&profile.primary_color, FALLBACK_PRIMARY);
        Self {
            text: white,
            tagline: with_alpha(white, 0.9),
            badge: with_alpha(black, 0.25),
            info_panel: with_alpha(black, 0.35),
            contact_panel: with_alpha(black, 0.28),
            guide: with_alpha(white, 0.25),
            gradient: with_alpha(primary, 0.45),
        }
    }
}

/// Both faces of one card plus the identifier printed on it.
#[derive(Debug, Clone)]
pub struct RenderedCard {
    pub identifier: String,
    pub front: Surface,
    pub back: Surface,
}

/// Composes card faces from a profile.
///
/// Images are resolved once into an [`AssetSet`]; every render allocates
/// fresh surfaces, so calls never share raster state.
#[derive(Debug, Clone)]
pub struct CardRenderer<E = Code128Encoder> {
    assets: AssetSet,
    logos: ScaledLogos,
    encoder: E,
}

/// Logo rasters already resized to the boxes they are drawn into.
#[derive(Debug, Clone, Default)]
struct ScaledLogos {
    front_mark: Option<RgbaImage>,
    contact_mark: Option<RgbaImage>,
    watermark: Option<RgbaImage>,
}

impl ScaledLogos {
    fn from_assets(assets: &AssetSet) -> Self {
        let mark = assets.logo_mark.image();
        let stretch = |size: u32| mark.map(|logo| resize(logo, size, size, FilterType::Triangle));
        let watermark = assets.logo_full.image().map(|logo| {
            let (width, height) = watermark_size(logo.width(), logo.height());
            resize(logo, width, height, FilterType::Triangle)
        });
        Self {
            front_mark: stretch(MARK_SIZE),
            contact_mark: stretch(CONTACT_MARK_SIZE),
            watermark,
        }
    }
}

/// Watermark box for a `width` x `height` logo: [`WATERMARK_WIDTH`] wide at the
/// logo's aspect ratio, shrunk so it is never taller than the card.
fn watermark_size(width: u32, height: u32) -> (u32, u32) {
    let aspect = height.max(1) as f64 / width.max(1) as f64;
    let scaled_height = (aspect * f64::from(WATERMARK_WIDTH)).round().max(1.0);
    if scaled_height <= f64::from(CARD_HEIGHT) {
        return (WATERMARK_WIDTH, scaled_height as u32);
    }
    let scaled_width = (f64::from(CARD_HEIGHT) / aspect).round().max(1.0) as u32;
    (scaled_width, CARD_HEIGHT)
}

impl CardRenderer<Code128Encoder> {
    /// Renderer with the profile's images loaded and a CODE128 barcode.
    pub fn for_profile(profile: &CardProfile) -> Self {
        Self::with_assets(AssetSet::load(profile), Code128Encoder::new())
    }
}

impl<E: BarcodeEncoder> CardRenderer<E> {
    pub fn with_assets(assets: AssetSet, encoder: E) -> Self {
        let logos = ScaledLogos::from_assets(&assets);
        Self {
            assets,
            logos,
            encoder,
        }
    }

    pub fn assets(&self) -> &AssetSet {
        &self.assets
    }

    /// Render the front and back for `profile`.
    pub fn render_card(&self, profile: &CardProfile) -> Result<RenderedCard, RenderError> {
        let back = self.render_back(profile)?;
        Ok(RenderedCard {
            identifier: preview_id(profile),
            front: self.render_front(profile),
            back,
        })
    }

    pub fn render_front(&self, profile: &CardProfile) -> Surface {
        let palette = Palette::for_profile(profile);
        let mut surface = Surface::new();
        surface.clear();
        let img = surface.image_mut();

        paint_background(img, profile, &self.assets.background);
        diagonal_fade(img, palette.gradient);

        draw_logo(img, self.logos.front_mark.as_ref(), W - BLEED - 120, BLEED);

        let left = BLEED + SAFE;
        draw_text(img, left, BLEED + 28, &title_case(&profile.brand_name), BRAND_STYLE, palette.text);
        draw_text(
            img,
            left,
            BLEED + 28 + 70,
            &profile.brand_tag.to_uppercase(),
            TAGLINE_STYLE,
            palette.tagline,
        );

        let badge_y = H - BLEED - 120;
        fill_rounded_rect(img, left, badge_y, BADGE_WIDTH, BADGE_HEIGHT, 16, palette.badge);
        let member = if profile.member_name.trim().is_empty() {
            "Member Name".to_string()
        } else {
            title_case(profile.member_name.trim())
        };
        let member_style = fit_scale(&member, BADGE_WIDTH - 48, MEMBER_STYLE, 2);
        let member_y = badge_y + (BADGE_HEIGHT as i32 - member_style.height() as i32) / 2;
        draw_text(img, BLEED + 48, member_y, &member, member_style, palette.text);

        if let Some(mark) = &self.logos.watermark {
            overlay_with_opacity(
                img,
                mark,
                i64::from(W - mark.width() as i32 - 60),
                i64::from(H - mark.height() as i32 - 40),
                WATERMARK_OPACITY,
            );
        }

        draw_guides(img, palette.guide);
        surface
    }

    pub fn render_back(&self, profile: &CardProfile) -> Result<Surface, RenderError> {
        let palette = Palette::for_profile(profile);
        let mut surface = Surface::new();
        surface.clear();
        let img = surface.image_mut();

        paint_background(img, profile, &self.assets.background);

        fill_rounded_rect(
            img,
            BLEED,
            H - INFO_PANEL_HEIGHT as i32 - BLEED,
            (W - BLEED * 2) as u32,
            INFO_PANEL_HEIGHT,
            14,
            palette.info_panel,
        );

        let left = BLEED + SAFE;
        draw_text(img, left, BLEED + 24, &profile.brand_tag, LABEL_STYLE, palette.text);
        let mut y = BLEED + 60;
        for paragraph in profile.legal.lines() {
            let lines = wrap(paragraph, LEGAL_WIDTH, |s| BODY_STYLE.measure(s));
            for line in &lines {
                draw_text(img, left, y, line, BODY_STYLE, palette.text);
                y += LINE_HEIGHT;
            }
            if !lines.is_empty() {
                y += PARAGRAPH_GAP;
            }
        }

        let identifier = preview_id(profile);
        let barcode = self
            .encoder
            .render(&identifier, BARCODE_WIDTH, BARCODE_HEIGHT)
            .map_err(|source| RenderError::Barcode {
                identifier: identifier.clone(),
                source,
            })?;
        let barcode = contrast(&barcode, BARCODE_CONTRAST);
        overlay(img, &barcode, i64::from(left), i64::from(H - 140));
        draw_text(img, left, H - 60, &identifier, BODY_STYLE, palette.text);

        let bx = W - BLEED - CONTACT_WIDTH as i32;
        fill_rounded_rect(img, bx, BLEED + 24, CONTACT_WIDTH, CONTACT_HEIGHT, 14, palette.contact_panel);
        draw_logo(img, self.logos.contact_mark.as_ref(), bx + 20, BLEED + 36);
        let text_x = bx + 90;
        draw_text(img, text_x, BLEED + 48, &title_case(&profile.brand_name), LABEL_STYLE, palette.text);
        draw_text(img, text_x, BLEED + 80, &format!("Ph: {}", profile.phone), BODY_STYLE, palette.text);
        draw_text(img, text_x, BLEED + 108, &profile.website, BODY_STYLE, palette.text);

        let address_width = CONTACT_WIDTH - 40;
        let mut ay = BLEED + 24 + CONTACT_HEIGHT as i32 + 12;
        for paragraph in profile.address.lines() {
            for line in wrap(paragraph, address_width, |s| BODY_STYLE.measure(s)) {
                draw_text(img, bx + 20, ay, &line, BODY_STYLE, palette.text);
                ay += LINE_HEIGHT;
            }
        }

        draw_guides(img, palette.guide);
        Ok(surface)
    }
}

/// Nothing is drawn when the logo is unavailable.
fn draw_logo(img: &mut RgbaImage, logo: Option<&RgbaImage>, x: i32, y: i32) {
    if let Some(logo) = logo {
        overlay(img, logo, i64::from(x), i64::from(y));
    }
}

/// Non-printing trim guide at the bleed inset.
fn draw_guides(img: &mut RgbaImage, color: Rgba<u8>) {
    let rect = Rect::at(BLEED, BLEED).of_size((W - BLEED * 2) as u32, (H - BLEED * 2) as u32);
    with_blend(img, |canvas| draw_hollow_rect_mut(canvas, rect, color));
}
