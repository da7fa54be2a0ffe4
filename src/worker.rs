use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use tracing::debug;

use crate::event::AppEvent;
use crate::generator::client::GenerationClient;
use crate::session::request::{GenerationOutcome, GenerationPayload, RequestToken};

/// Runs generation calls off the UI thread, one short-lived thread per
/// request, and posts each result back as `AppEvent::Generated`.
#[derive(Clone)]
pub struct GenerationWorker {
    client: Arc<GenerationClient>,
    tx: Sender<AppEvent>,
}

impl GenerationWorker {
    pub fn new(client: Arc<GenerationClient>, tx: Sender<AppEvent>) -> Self {
        Self { client, tx }
    }

    pub fn request_lesson(&self, token: RequestToken, topic: &'static str) {
        self.spawn(token, move |client| {
            GenerationPayload::Lesson(client.generate_lesson_content(topic))
        });
    }

    pub fn request_quiz(&self, token: RequestToken, topic: &'static str, question_count: usize) {
        self.spawn(token, move |client| {
            GenerationPayload::Quiz(client.generate_quiz(topic, question_count))
        });
    }

    pub fn request_image(&self, token: RequestToken, section: usize, prompt: String) {
        self.spawn(token, move |client| GenerationPayload::Image {
            section,
            result: client.generate_image_from_prompt(&prompt),
        });
    }

    fn spawn<F>(&self, token: RequestToken, job: F)
    where
        F: FnOnce(&GenerationClient) -> GenerationPayload + Send + 'static,
    {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let payload = job(&client);
            debug!(token = token.value(), kind = payload.kind(), "generation finished");
            // The UI may already be gone on shutdown.
            let _ = tx.send(AppEvent::Generated(GenerationOutcome { token, payload }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    use crate::generator::client::tests::{FakeProvider, LESSON_JSON};
    use crate::session::request::RequestTracker;
    use crate::store::credential::CredentialStore;
    use crate::store::kv::MemoryStore;

    fn recv(rx: &mpsc::Receiver<AppEvent>) -> GenerationOutcome {
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            AppEvent::Generated(outcome) => outcome,
            _ => panic!("expected a generation outcome"),
        }
    }

    #[test]
    fn test_outcome_carries_token() {
        let provider = Arc::new(FakeProvider::with_json(LESSON_JSON));
        let credentials = CredentialStore::new(Arc::new(MemoryStore::new()));
        credentials.set_api_key("key").unwrap();
        let client = GenerationClient::new(Box::new(provider), credentials, "English");

        let (tx, rx) = mpsc::channel();
        let worker = GenerationWorker::new(Arc::new(client), tx);
        let token = RequestTracker::new().issue();
        worker.request_lesson(token, "topic");

        let outcome = recv(&rx);
        assert_eq!(outcome.token, token);
        assert!(matches!(outcome.payload, GenerationPayload::Lesson(Ok(_))));
    }

    #[test]
    fn test_missing_key_is_reported_not_panicked() {
        let provider = Arc::new(FakeProvider::default());
        let credentials = CredentialStore::new(Arc::new(MemoryStore::new()));
        let client = GenerationClient::new(Box::new(provider), credentials, "English");

        let (tx, rx) = mpsc::channel();
        let worker = GenerationWorker::new(Arc::new(client), tx);
        let token = RequestTracker::new().issue();
        worker.request_image(token, 2, "chart".to_string());

        match recv(&rx).payload {
            GenerationPayload::Image { section, result } => {
                assert_eq!(section, 2);
                assert!(result.unwrap_err().is_invalid_credential());
            }
            _ => panic!("expected an image payload"),
        }
    }
}
