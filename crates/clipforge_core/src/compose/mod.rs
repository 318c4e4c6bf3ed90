//! Render composer.
//!
//! Combines the spatial layout plan with the temporal policy instructions
//! into a single ordered list of render operations - the sole artifact
//! handed to the external media engine.
//!
//! Ordering contract: global spatial operations first (crop, background
//! fill, camera overlay), since they apply uniformly across the full
//! duration; then temporal operations stably ordered by start time, with
//! MuteAudio before DrawSubtitle on equal starts because audio processing
//! must not depend on subtitle render state. Operations with overlapping
//! windows must be safely composable in the given order without extra
//! synchronization.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::LayoutPlan;
use crate::models::{
    CameraPlacement, CensorInterval, CensorReason, FillMode, OperationKind, Rect, SpeakerId,
    SubtitleCue,
};

/// Time scope of a render operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    /// Applies across the full duration.
    Global,
    /// Applies over a bounded span.
    Span { start_ms: i64, end_ms: i64 },
}

impl TimeWindow {
    /// End of the window, if bounded.
    pub fn end_ms(&self) -> Option<i64> {
        match self {
            Self::Global => None,
            Self::Span { end_ms, .. } => Some(*end_ms),
        }
    }

    /// Sort key: global operations first, then by start time.
    fn start_key(&self) -> i64 {
        match self {
            Self::Global => i64::MIN,
            Self::Span { start_ms, .. } => *start_ms,
        }
    }
}

/// Typed parameters of a render operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationParams {
    Crop {
        rect: Rect,
    },
    FillBackground {
        mode: FillMode,
    },
    OverlayCamera {
        rect: Rect,
        placement: CameraPlacement,
    },
    MuteAudio {
        reason: CensorReason,
    },
    DrawSubtitle {
        text: String,
        speaker_id: SpeakerId,
        color: String,
    },
}

impl OperationParams {
    /// The operation kind discriminant.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Crop { .. } => OperationKind::Crop,
            Self::FillBackground { .. } => OperationKind::FillBackground,
            Self::OverlayCamera { .. } => OperationKind::OverlayCamera,
            Self::MuteAudio { .. } => OperationKind::MuteAudio,
            Self::DrawSubtitle { .. } => OperationKind::DrawSubtitle,
        }
    }
}

/// One element of the ordered render operation sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOperation {
    pub params: OperationParams,
    pub time_window: TimeWindow,
}

impl RenderOperation {
    /// Global-scope operation.
    pub fn global(params: OperationParams) -> Self {
        Self {
            params,
            time_window: TimeWindow::Global,
        }
    }

    /// Bounded-span operation.
    pub fn spanned(params: OperationParams, start_ms: i64, end_ms: i64) -> Self {
        Self {
            params,
            time_window: TimeWindow::Span { start_ms, end_ms },
        }
    }

    /// The operation kind discriminant.
    pub fn kind(&self) -> OperationKind {
        self.params.kind()
    }
}

/// Composition failure.
///
/// An operation window past the media duration indicates upstream
/// timestamp corruption; not retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error("{kind} operation window ends at {end_ms}ms, past media duration {duration_ms}ms")]
    OutOfBoundsOperation {
        kind: OperationKind,
        end_ms: i64,
        duration_ms: i64,
    },
}

/// Compose the ordered render operation sequence.
///
/// Deterministic: identical inputs produce an identical sequence. The only
/// temporal validation is the duration bound; everything else was
/// validated by the producing stages.
pub fn compose(
    layout: &LayoutPlan,
    censors: &[CensorInterval],
    subtitles: &[SubtitleCue],
    duration_ms: i64,
) -> Result<Vec<RenderOperation>, ComposeError> {
    let mut operations = Vec::with_capacity(3 + censors.len() + subtitles.len());

    operations.push(RenderOperation::global(OperationParams::Crop {
        rect: layout.crop_rect,
    }));

    if layout.fill_mode != FillMode::None {
        operations.push(RenderOperation::global(OperationParams::FillBackground {
            mode: layout.fill_mode,
        }));
    }

    if layout.camera_placement != CameraPlacement::None {
        if let Some(rect) = layout.camera_rect {
            operations.push(RenderOperation::global(OperationParams::OverlayCamera {
                rect,
                placement: layout.camera_placement,
            }));
        }
    }

    let mut temporal = Vec::with_capacity(censors.len() + subtitles.len());
    for censor in censors {
        temporal.push(RenderOperation::spanned(
            OperationParams::MuteAudio {
                reason: censor.reason,
            },
            censor.start_ms,
            censor.end_ms,
        ));
    }
    for cue in subtitles {
        temporal.push(RenderOperation::spanned(
            OperationParams::DrawSubtitle {
                text: cue.text.clone(),
                speaker_id: cue.speaker_id.clone(),
                color: cue.color.clone(),
            },
            cue.start_ms,
            cue.end_ms,
        ));
    }

    temporal.sort_by_key(|op| (op.time_window.start_key(), op.kind().priority()));
    operations.extend(temporal);

    for op in &operations {
        if let Some(end_ms) = op.time_window.end_ms() {
            if end_ms > duration_ms {
                return Err(ComposeError::OutOfBoundsOperation {
                    kind: op.kind(),
                    end_ms,
                    duration_ms,
                });
            }
        }
    }

    Ok(operations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Dimensions;

    fn layout_plain() -> LayoutPlan {
        LayoutPlan {
            crop_rect: Rect::new(656, 0, 608, 1080),
            camera_rect: None,
            camera_placement: CameraPlacement::None,
            fill_mode: FillMode::None,
        }
    }

    fn layout_full() -> LayoutPlan {
        LayoutPlan {
            crop_rect: Rect::new(505, 0, 910, 1080),
            camera_rect: Some(Rect::new(1420, 790, 480, 270)),
            camera_placement: CameraPlacement::Top,
            fill_mode: FillMode::Blur,
        }
    }

    fn cue(text: &str, start: i64, end: i64) -> SubtitleCue {
        SubtitleCue {
            text: text.to_string(),
            speaker_id: SpeakerId::new("A"),
            color: "#FFFFFF".to_string(),
            start_ms: start,
            end_ms: end,
        }
    }

    #[test]
    fn spatial_operations_come_first_in_order() {
        let ops = compose(
            &layout_full(),
            &[CensorInterval::profanity(100, 400)],
            &[cue("hi", 0, 900)],
            60_000,
        )
        .unwrap();

        let kinds: Vec<OperationKind> = ops.iter().map(|o| o.kind()).collect();
        assert_eq!(
            kinds[..3],
            [
                OperationKind::Crop,
                OperationKind::FillBackground,
                OperationKind::OverlayCamera
            ]
        );
        assert!(matches!(ops[0].time_window, TimeWindow::Global));
    }

    #[test]
    fn plain_layout_emits_only_crop() {
        let ops = compose(&layout_plain(), &[], &[], 60_000).unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].kind(), OperationKind::Crop);
    }

    #[test]
    fn temporal_operations_sorted_by_start() {
        let ops = compose(
            &layout_plain(),
            &[
                CensorInterval::profanity(5000, 5400),
                CensorInterval::profanity(1000, 1300),
            ],
            &[cue("b", 3000, 4000), cue("a", 500, 900)],
            60_000,
        )
        .unwrap();

        let starts: Vec<i64> = ops[1..]
            .iter()
            .filter_map(|o| match o.time_window {
                TimeWindow::Span { start_ms, .. } => Some(start_ms),
                TimeWindow::Global => None,
            })
            .collect();
        assert_eq!(starts, vec![500, 1000, 3000, 5000]);
    }

    #[test]
    fn mute_sorts_before_subtitle_on_equal_start() {
        let ops = compose(
            &layout_plain(),
            &[CensorInterval::profanity(900, 1200)],
            &[cue("****", 900, 1300)],
            60_000,
        )
        .unwrap();

        assert_eq!(ops[1].kind(), OperationKind::MuteAudio);
        assert_eq!(ops[2].kind(), OperationKind::DrawSubtitle);
    }

    #[test]
    fn window_past_duration_is_rejected() {
        let err = compose(
            &layout_plain(),
            &[],
            &[cue("late", 59_000, 61_000)],
            60_000,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ComposeError::OutOfBoundsOperation {
                kind: OperationKind::DrawSubtitle,
                end_ms: 61_000,
                duration_ms: 60_000,
            }
        ));
    }

    #[test]
    fn compose_is_idempotent() {
        let censors = vec![
            CensorInterval::profanity(1000, 1400),
            CensorInterval::profanity(9000, 9200),
        ];
        let cues = vec![cue("one", 0, 900), cue("two", 1000, 2000)];

        let first = compose(&layout_full(), &censors, &cues, 60_000).unwrap();
        let second = compose(&layout_full(), &censors, &cues, 60_000).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn sequence_serializes_for_audit() {
        let ops = compose(&layout_plain(), &[], &[cue("gg", 0, 500)], 60_000).unwrap();
        let json = serde_json::to_string(&ops).unwrap();
        assert!(json.contains("\"kind\":\"crop\""));
        assert!(json.contains("\"kind\":\"draw_subtitle\""));
    }

    #[test]
    fn crop_rect_matches_layout_source_bounds() {
        let ops = compose(&layout_plain(), &[], &[], 60_000).unwrap();
        match &ops[0].params {
            OperationParams::Crop { rect } => {
                assert!(rect.fits_within(Dimensions::new(1920, 1080)));
            }
            other => panic!("expected crop, got {:?}", other),
        }
    }
}
