//! Layout planner.
//!
//! Computes the spatial transform plan for reprojecting a source frame into
//! the vertical target aspect: the crop rectangle for primary content, an
//! optional camera-feed rectangle and its output band, and the fill
//! strategy for any residual letterbox area.
//!
//! All rectangles are in source pixel coordinates; `camera_placement`
//! says which output band hosts the camera. The plan is computed once per
//! source video and consumed read-only by the render composer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::LayoutSettings;
use crate::models::{
    even_floor, AspectRatio, CameraPlacement, Dimensions, FillMode, PlacementPreference, Rect,
};

/// Spatial transform plan for one source video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPlan {
    /// Primary content region of the source frame.
    pub crop_rect: Rect,
    /// Camera-feed region of the source frame, when hosted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_rect: Option<Rect>,
    /// Output band hosting the camera feed.
    pub camera_placement: CameraPlacement,
    /// Fill strategy for residual output area.
    pub fill_mode: FillMode,
}

/// Layout planning failure.
///
/// Not retryable: the caller must correct the geometry input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("invalid layout request: {detail}")]
    InvalidLayoutRequest { detail: String },
}

impl LayoutError {
    fn invalid(detail: impl Into<String>) -> Self {
        Self::InvalidLayoutRequest {
            detail: detail.into(),
        }
    }
}

/// Compute the layout plan for a source frame.
///
/// A source aspect already matching the target within tolerance yields a
/// full-frame crop with nothing to fill. Otherwise the crop is the largest
/// centered rectangle whose aspect matches the content band, the camera
/// region is hosted in the top or bottom band when it fits and stays clear
/// of the crop, and residual area is filled per the configured preference.
pub fn plan(
    source: Dimensions,
    target: AspectRatio,
    camera_region: Option<Rect>,
    settings: &LayoutSettings,
) -> Result<LayoutPlan, LayoutError> {
    if target.is_degenerate() {
        return Err(LayoutError::invalid(format!(
            "target aspect {} has a non-positive component",
            target
        )));
    }
    if source.is_degenerate() {
        return Err(LayoutError::invalid(format!(
            "source dimensions {}x{} are degenerate",
            source.width, source.height
        )));
    }

    let source_ratio = source.aspect();
    let target_ratio = target.ratio();

    if (source_ratio - target_ratio).abs() <= settings.aspect_tolerance {
        return Ok(LayoutPlan {
            crop_rect: Rect::full_frame(source),
            camera_rect: None,
            camera_placement: CameraPlacement::None,
            fill_mode: FillMode::None,
        });
    }

    // A camera region that falls outside the frame is unusable signal, not
    // a hard error; the plan degrades to no camera.
    let camera = camera_region.filter(|region| {
        let usable = !region_is_degenerate(region) && region.fits_within(source);
        if !usable {
            tracing::warn!(?region, "camera region outside source frame, ignoring");
        }
        usable
    });

    if let Some(region) = camera {
        let scaled_frac = camera_scaled_height_frac(&region, target_ratio);
        if scaled_frac <= settings.camera_band_frac + 1e-9 {
            let content_frac = 1.0 - settings.camera_band_frac;
            let crop_rect = centered_crop(source, target_ratio / content_frac);
            if !crop_rect.intersects(&region) {
                let placement = pick_side(
                    settings.camera_placement_preference,
                    source,
                    &crop_rect,
                );
                let residual_frac = settings.camera_band_frac - scaled_frac;
                let fill_mode = if residual_frac > 0.005 {
                    FillMode::from_preference(settings.fill_preference)
                } else {
                    FillMode::None
                };
                return Ok(LayoutPlan {
                    crop_rect,
                    camera_rect: Some(region),
                    camera_placement: placement,
                    fill_mode,
                });
            }
            tracing::debug!("camera region overlaps crop, dropping camera band");
        } else {
            tracing::debug!(
                scaled_frac,
                band_frac = settings.camera_band_frac,
                "camera region too tall for band"
            );
        }
    }

    // No camera hosted: content spans the configured fraction of the
    // output (full height unless a letterbox band is requested).
    let content_frac = settings
        .content_height_frac
        .unwrap_or(1.0)
        .clamp(0.1, 1.0);
    let crop_rect = centered_crop(source, target_ratio / content_frac);
    let fill_mode = if content_frac < 1.0 {
        FillMode::from_preference(settings.fill_preference)
    } else {
        FillMode::None
    };

    Ok(LayoutPlan {
        crop_rect,
        camera_rect: None,
        camera_placement: CameraPlacement::None,
        fill_mode,
    })
}

/// Largest centered rectangle of the given aspect that fits in the frame,
/// with even dimensions.
fn centered_crop(source: Dimensions, aspect: f64) -> Rect {
    let source_ratio = source.aspect();
    let (width, height) = if source_ratio > aspect {
        // Source is wider: full height, crop width.
        let height = even_floor(source.height);
        let width = even_floor((f64::from(height) * aspect) as u32).min(source.width);
        (width, height)
    } else {
        // Source is taller: full width, crop height.
        let width = even_floor(source.width);
        let height = even_floor((f64::from(width) / aspect) as u32).min(source.height);
        (width, height)
    };

    Rect::new(
        (source.width - width) / 2,
        (source.height - height) / 2,
        width,
        height,
    )
}

/// Height the camera would occupy in the output, as a fraction of output
/// height, when scaled to the full output width.
fn camera_scaled_height_frac(region: &Rect, target_ratio: f64) -> f64 {
    (f64::from(region.height) / f64::from(region.width)) * target_ratio
}

/// Pick the output band side for the camera.
///
/// Auto compares how much of the source frame's top and bottom thirds the
/// crop occupies and picks the emptier side, ties toward top.
fn pick_side(
    preference: PlacementPreference,
    source: Dimensions,
    crop: &Rect,
) -> CameraPlacement {
    match preference {
        PlacementPreference::Top => CameraPlacement::Top,
        PlacementPreference::Bottom => CameraPlacement::Bottom,
        PlacementPreference::Auto => {
            let third = source.height / 3;
            let top_third = Rect::new(0, 0, source.width, third);
            let bottom_third = Rect::new(0, source.height - third, source.width, third);
            if crop.intersection_area(&bottom_third) < crop.intersection_area(&top_third) {
                CameraPlacement::Bottom
            } else {
                CameraPlacement::Top
            }
        }
    }
}

fn region_is_degenerate(region: &Rect) -> bool {
    region.width == 0 || region.height == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FillPreference;

    fn settings() -> LayoutSettings {
        LayoutSettings::default()
    }

    #[test]
    fn degenerate_target_rejected() {
        let err = plan(
            Dimensions::new(1920, 1080),
            AspectRatio::new(0, 16),
            None,
            &settings(),
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidLayoutRequest { .. }));

        assert!(plan(
            Dimensions::new(1920, 1080),
            AspectRatio::new(9, -16),
            None,
            &settings(),
        )
        .is_err());
    }

    #[test]
    fn matching_aspect_uses_full_frame() {
        let plan = plan(
            Dimensions::new(1080, 1920),
            AspectRatio::new(9, 16),
            None,
            &settings(),
        )
        .unwrap();
        assert_eq!(plan.crop_rect, Rect::new(0, 0, 1080, 1920));
        assert_eq!(plan.fill_mode, FillMode::None);
        assert_eq!(plan.camera_placement, CameraPlacement::None);
    }

    #[test]
    fn wide_source_gets_centered_vertical_crop() {
        // Landscape 1080p into 9:16: roughly 607x1080, centered, no fill.
        let plan = plan(
            Dimensions::new(1920, 1080),
            AspectRatio::new(9, 16),
            None,
            &settings(),
        )
        .unwrap();

        let crop = plan.crop_rect;
        assert!(crop.width >= 604 && crop.width <= 608, "width {}", crop.width);
        assert_eq!(crop.height, 1080);
        assert_eq!(crop.y, 0);
        // Centered within a pixel of exact.
        let expected_x = (1920 - crop.width) / 2;
        assert_eq!(crop.x, expected_x);
        assert_eq!(plan.fill_mode, FillMode::None);
        assert_eq!(plan.camera_placement, CameraPlacement::None);
    }

    #[test]
    fn crop_stays_within_source_bounds() {
        for (w, h) in [(1920, 1080), (1280, 720), (3440, 1440), (640, 480)] {
            let plan = plan(
                Dimensions::new(w, h),
                AspectRatio::new(9, 16),
                None,
                &settings(),
            )
            .unwrap();
            assert!(plan.crop_rect.fits_within(Dimensions::new(w, h)));
        }
    }

    #[test]
    fn camera_hosted_when_it_fits_and_clears_crop() {
        // Standard capture layout: 16:9 camera in the bottom-right corner.
        let camera = Rect::new(1420, 790, 480, 270);
        let plan = plan(
            Dimensions::new(1920, 1080),
            AspectRatio::new(9, 16),
            Some(camera),
            &settings(),
        )
        .unwrap();

        assert_eq!(plan.camera_rect, Some(camera));
        assert_ne!(plan.camera_placement, CameraPlacement::None);
        assert!(!plan.crop_rect.intersects(&camera));
    }

    #[test]
    fn overlapping_camera_region_is_dropped() {
        // Camera dead center overlaps any centered crop.
        let camera = Rect::new(800, 400, 320, 180);
        let plan = plan(
            Dimensions::new(1920, 1080),
            AspectRatio::new(9, 16),
            Some(camera),
            &settings(),
        )
        .unwrap();

        assert_eq!(plan.camera_rect, None);
        assert_eq!(plan.camera_placement, CameraPlacement::None);
    }

    #[test]
    fn out_of_frame_camera_region_is_ignored() {
        let camera = Rect::new(1800, 900, 480, 270);
        let plan = plan(
            Dimensions::new(1920, 1080),
            AspectRatio::new(9, 16),
            Some(camera),
            &settings(),
        )
        .unwrap();
        assert_eq!(plan.camera_rect, None);
    }

    #[test]
    fn too_tall_camera_region_is_not_hosted() {
        // Portrait camera region scaled to output width overflows the band.
        let camera = Rect::new(1600, 100, 200, 800);
        let plan = plan(
            Dimensions::new(1920, 1080),
            AspectRatio::new(9, 16),
            Some(camera),
            &settings(),
        )
        .unwrap();
        assert_eq!(plan.camera_placement, CameraPlacement::None);
    }

    #[test]
    fn explicit_placement_preference_wins() {
        let camera = Rect::new(1420, 790, 480, 270);
        let cfg = LayoutSettings {
            camera_placement_preference: PlacementPreference::Bottom,
            ..LayoutSettings::default()
        };
        let plan = plan(
            Dimensions::new(1920, 1080),
            AspectRatio::new(9, 16),
            Some(camera),
            &cfg,
        )
        .unwrap();
        assert_eq!(plan.camera_placement, CameraPlacement::Bottom);
    }

    #[test]
    fn letterbox_band_requests_fill() {
        let cfg = LayoutSettings {
            content_height_frac: Some(0.68),
            fill_preference: FillPreference::Blur,
            ..LayoutSettings::default()
        };
        let plan = plan(
            Dimensions::new(1920, 1080),
            AspectRatio::new(9, 16),
            None,
            &cfg,
        )
        .unwrap();
        assert_eq!(plan.fill_mode, FillMode::Blur);
        // Narrow content band means a wider source crop.
        assert!(plan.crop_rect.width > 700);
    }

    #[test]
    fn solid_fill_preference_respected() {
        let cfg = LayoutSettings {
            content_height_frac: Some(0.68),
            fill_preference: FillPreference::Solid,
            ..LayoutSettings::default()
        };
        let plan = plan(
            Dimensions::new(1920, 1080),
            AspectRatio::new(9, 16),
            None,
            &cfg,
        )
        .unwrap();
        assert_eq!(plan.fill_mode, FillMode::Solid);
    }

    #[test]
    fn plan_is_deterministic() {
        let camera = Rect::new(1420, 790, 480, 270);
        let a = plan(
            Dimensions::new(1920, 1080),
            AspectRatio::new(9, 16),
            Some(camera),
            &settings(),
        )
        .unwrap();
        let b = plan(
            Dimensions::new(1920, 1080),
            AspectRatio::new(9, 16),
            Some(camera),
            &settings(),
        )
        .unwrap();
        assert_eq!(a, b);
    }
}
