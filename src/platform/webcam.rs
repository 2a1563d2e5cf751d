//! Webcam + pose model turn input
//!
//! The page loads TF.js pose-detection (global `poseDetection`); the inline
//! module below owns the video stream and detector and hands each pose back
//! as JSON. Interpretation happens in `crate::pose`.

use js_sys::Promise;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::error::GameError;
use crate::input::{TurnIntent, TurnIntentSource};
use crate::pose::{PoseThresholds, ready_from_json, turn_from_json};

#[wasm_bindgen(inline_js = "
    let detector = null;
    let video = null;

    export async function pose_init(videoId, width, height) {
        if (!navigator.mediaDevices || !navigator.mediaDevices.getUserMedia) {
            throw new Error('navigator.mediaDevices.getUserMedia not available');
        }
        video = document.getElementById(videoId);
        if (!video) {
            throw new Error('video element not found: ' + videoId);
        }
        const isMobile = /Android|iPhone|iPad|iPod/i.test(navigator.userAgent);
        video.width = width;
        video.height = height;
        const stream = await navigator.mediaDevices.getUserMedia({
            audio: false,
            video: {
                facingMode: 'user',
                width: isMobile ? undefined : width,
                height: isMobile ? undefined : height,
            },
        });
        video.srcObject = stream;
        await new Promise((resolve) => { video.onloadedmetadata = () => resolve(); });
        await video.play();
        detector = await poseDetection.createDetector(
            poseDetection.SupportedModels.MoveNet,
            { modelType: poseDetection.movenet.modelType.SINGLEPOSE_LIGHTNING }
        );
    }

    export function pose_detector_ready() {
        return detector !== null;
    }

    export async function pose_estimate() {
        if (!detector || !video || video.paused || video.ended) {
            return null;
        }
        const poses = await detector.estimatePoses(video, { flipHorizontal: false });
        return poses && poses.length > 0 ? JSON.stringify(poses[0]) : null;
    }

    export function pose_dispose() {
        if (detector) {
            detector.dispose();
            detector = null;
        }
        if (video && video.srcObject) {
            video.srcObject.getTracks().forEach((track) => track.stop());
            video.srcObject = null;
        }
    }
")]
extern "C" {
    fn pose_init(video_id: &str, width: f64, height: f64) -> Promise;
    fn pose_detector_ready() -> bool;
    fn pose_estimate() -> Promise;
    fn pose_dispose();
}

/// Readable text for a rejected promise
fn describe(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

/// Turn input from arm gestures seen by the webcam
pub struct WebcamIntentSource {
    video_id: String,
    width: f64,
    height: f64,
    thresholds: PoseThresholds,
    initialized: bool,
    disposed: bool,
}

impl WebcamIntentSource {
    pub fn new(video_id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            video_id: video_id.into(),
            width,
            height,
            thresholds: PoseThresholds::default(),
            initialized: false,
            disposed: false,
        }
    }

    /// Latest pose as JSON; `None` when there is no person or the model failed
    async fn estimate(&self) -> Option<String> {
        match JsFuture::from(pose_estimate()).await {
            Ok(value) => value.as_string(),
            Err(e) => {
                log::warn!("{}", GameError::Js(describe(&e)));
                None
            }
        }
    }
}

impl TurnIntentSource for WebcamIntentSource {
    async fn initialize(&mut self) -> Result<(), GameError> {
        JsFuture::from(pose_init(&self.video_id, self.width, self.height))
            .await
            .map_err(|e| GameError::InputInit(describe(&e)))?;
        self.initialized = true;
        self.disposed = false;
        log::info!("Pose detector initialized");
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.initialized && !self.disposed && pose_detector_ready()
    }

    async fn is_pose_visible(&mut self) -> bool {
        match self.estimate().await {
            Some(json) => ready_from_json(&json, &self.thresholds),
            None => false,
        }
    }

    async fn detect_turn_direction(&mut self) -> TurnIntent {
        match self.estimate().await {
            Some(json) => turn_from_json(&json, &self.thresholds),
            None => TurnIntent::None,
        }
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        pose_dispose();
        self.disposed = true;
        log::info!("Pose detector disposed");
    }
}
