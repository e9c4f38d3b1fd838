use crate::selection::ImageSelection;
use services::{RecognitionService, ServiceError};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

type TagListener = Box<dyn Fn(&[String]) + Send + Sync>;

#[derive(Default)]
struct RecognizeState {
    selection: Option<ImageSelection>,
    tags: Vec<String>,
    // Bumped by every mutation that invalidates in-flight work; completion
    // handlers compare their captured value and drop stale responses.
    generation: u64,
    last_error: Option<ServiceError>,
}

/// Owns the current image selection and the tags recognized for it.
pub struct RecognizeController {
    service: Arc<dyn RecognitionService>,
    state: Mutex<RecognizeState>,
    on_tags: Option<TagListener>,
}

impl RecognizeController {
    pub fn new(service: Arc<dyn RecognitionService>) -> Self {
        Self {
            service,
            state: Mutex::new(RecognizeState::default()),
            on_tags: None,
        }
    }

    /// Registers the listener that receives every published tag list.
    pub fn with_tag_listener(
        mut self,
        listener: impl Fn(&[String]) + Send + Sync + 'static,
    ) -> Self {
        self.on_tags = Some(Box::new(listener));
        self
    }

    /// Replaces the selection. Non-image input is a silent no-op. A new
    /// selection always clears previously recognized tags and cancels any
    /// recognition still in flight.
    pub async fn select_image(&self, file_name: &str, data: Vec<u8>) {
        let Some(selection) = ImageSelection::from_bytes(file_name, data) else {
            return;
        };
        self.apply_selection(selection).await;
    }

    pub async fn select_image_file(&self, path: &Path) {
        let Some(selection) = ImageSelection::from_file(path) else {
            return;
        };
        self.apply_selection(selection).await;
    }

    async fn apply_selection(&self, selection: ImageSelection) {
        {
            let mut st = self.state.lock().await;
            st.selection = Some(selection);
            st.tags.clear();
            st.generation += 1;
        }
        self.publish(&[]);
    }

    /// Sends the selected image to the recognition service and replaces the
    /// tag list with the projected predictions. No-op without a selection.
    /// Failures leave the previous tags in place; only `last_error` records
    /// what happened.
    pub async fn recognize(&self) {
        let (selection, generation) = {
            let mut st = self.state.lock().await;
            let Some(selection) = st.selection.clone() else {
                debug!("recognize requested without a selection");
                return;
            };
            st.generation += 1;
            (selection, st.generation)
        };

        let result = self
            .service
            .recognize(&selection.file_name, &selection.mime, selection.data)
            .await;

        match result {
            Ok(predictions) => {
                let tags: Vec<String> = predictions.into_iter().map(|p| p.tag).collect();
                {
                    let mut st = self.state.lock().await;
                    if st.generation != generation {
                        debug!("discarding stale recognition response");
                        return;
                    }
                    st.tags = tags.clone();
                    st.last_error = None;
                }
                self.publish(&tags);
            }
            Err(err) => {
                warn!(%err, "image recognition failed");
                let mut st = self.state.lock().await;
                if st.generation == generation {
                    st.last_error = Some(err);
                }
            }
        }
    }

    fn publish(&self, tags: &[String]) {
        if let Some(listener) = &self.on_tags {
            listener(tags);
        }
    }

    pub async fn selection(&self) -> Option<ImageSelection> {
        self.state.lock().await.selection.clone()
    }

    pub async fn tags(&self) -> Vec<String> {
        self.state.lock().await.tags.clone()
    }

    pub async fn last_error(&self) -> Option<ServiceError> {
        self.state.lock().await.last_error.clone()
    }
}
