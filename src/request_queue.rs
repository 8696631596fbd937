use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use log::{debug, warn};

use crate::media_list::MediaList;
use crate::request::ConvertRequest;

#[derive(Clone, Debug, PartialEq)]
pub enum RequestQueueMessage {
    Notice(String),
    Finish,
}

type Subscribers = Arc<Mutex<Vec<Sender<RequestQueueMessage>>>>;

/// Applies inbound requests to the media list one at a time on a single worker thread.
/// `None` stands for a message that carried no request.
pub struct RequestQueue {
    tx: Option<Sender<Option<ConvertRequest>>>,
    subscribers: Subscribers,
    worker: Option<JoinHandle<()>>,
}

impl RequestQueue {
    pub fn new(media_list: Arc<Mutex<MediaList>>) -> Self {
        let (tx, rx) = mpsc::channel();
        let subscribers: Subscribers = Arc::new(Mutex::new(vec![]));
        let worker_subscribers = Arc::clone(&subscribers);
        let worker = thread::spawn(move || forever(rx, media_list, worker_subscribers));

        RequestQueue {
            tx: Some(tx),
            subscribers,
            worker: Some(worker),
        }
    }

    pub fn subscribe(&self) -> Receiver<RequestQueueMessage> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(tx);
        rx
    }

    pub fn send(&self, request: Option<ConvertRequest>) {
        if let Some(tx) = &self.tx {
            if tx.send(request).is_err() {
                warn!("request queue worker is gone; dropping request");
            }
        }
    }

    /// Stops accepting requests and waits until every queued one is applied.
    pub fn close(&mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("request queue worker panicked");
            }
        }
    }
}

impl Drop for RequestQueue {
    fn drop(&mut self) {
        self.close();
    }
}

/// What the worker published once the queue is closed.
#[derive(Debug, Default, PartialEq)]
pub struct QueueOutcome {
    pub notices: Vec<String>,
    pub finish: bool,
}

/// Collects the notices published so far. A `Finish` only counts when the
/// list is still empty once every request is applied; a later request may
/// have filled it.
pub fn drain_messages(messages: &Receiver<RequestQueueMessage>, media_list: &Arc<Mutex<MediaList>>) -> QueueOutcome {
    let mut outcome = QueueOutcome::default();
    for msg in messages.try_iter() {
        match msg {
            RequestQueueMessage::Notice(notice) => outcome.notices.push(notice),
            RequestQueueMessage::Finish => debug!("request queue reported an empty list"),
        }
    }

    outcome.finish = media_list
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .is_empty();
    outcome
}

fn forever(rx: Receiver<Option<ConvertRequest>>, media_list: Arc<Mutex<MediaList>>, subscribers: Subscribers) {
    for request in rx {
        let mut list = media_list.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(request) = request {
            debug!("applying request {:?} with {} file(s)", request.action, request.media_files_to_convert.len());
            for notice in list.apply_request(&request) {
                publish(&subscribers, RequestQueueMessage::Notice(notice));
            }
        }

        // nothing could be added, so there is nothing left to show
        if list.is_empty() {
            publish(&subscribers, RequestQueueMessage::Finish);
        }
    }
}

fn publish(subscribers: &Subscribers, msg: RequestQueueMessage) {
    let subscribers = subscribers.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    for tx in subscribers.iter() {
        let _ = tx.send(msg.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::MediaFileToConvert;
    use std::fs::File;

    #[test]
    fn test_finish_when_nothing_added() {
        let list = Arc::new(Mutex::new(MediaList::new()));
        let mut queue = RequestQueue::new(Arc::clone(&list));
        let rx = queue.subscribe();

        queue.send(None);
        queue.send(Some(ConvertRequest {
            action: String::from("bogus"),
            media_files_to_convert: vec![],
        }));
        queue.close();

        let messages: Vec<RequestQueueMessage> = rx.try_iter().collect();
        assert_eq!(messages, vec![
            RequestQueueMessage::Finish,
            RequestQueueMessage::Notice(String::from("Unknown action: bogus")),
            RequestQueueMessage::Finish,
        ]);
    }

    fn convert(path: &std::path::Path) -> ConvertRequest {
        ConvertRequest::convert_media(vec![MediaFileToConvert {
            input_file_path: path.display().to_string(),
            output_file_path: String::new(),
            can_use_sound: false,
        }])
    }

    #[test]
    fn test_early_finish_does_not_discard_later_items() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.mp4");
        File::create(&a).unwrap();

        let list = Arc::new(Mutex::new(MediaList::new()));
        let mut queue = RequestQueue::new(Arc::clone(&list));
        let rx = queue.subscribe();

        queue.send(None);
        queue.send(Some(convert(&a)));
        queue.close();

        let outcome = drain_messages(&rx, &list);
        assert!(!outcome.finish);
        assert!(outcome.notices.is_empty());
        assert_eq!(list.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_finish_when_list_stays_empty() {
        let list = Arc::new(Mutex::new(MediaList::new()));
        let mut queue = RequestQueue::new(Arc::clone(&list));
        let rx = queue.subscribe();

        queue.send(Some(ConvertRequest {
            action: String::from("bogus"),
            media_files_to_convert: vec![],
        }));
        queue.close();

        assert_eq!(drain_messages(&rx, &list), QueueOutcome {
            notices: vec![String::from("Unknown action: bogus")],
            finish: true,
        });
    }

    #[test]
    fn test_finish_without_any_request() {
        let list = Arc::new(Mutex::new(MediaList::new()));
        let mut queue = RequestQueue::new(Arc::clone(&list));
        let rx = queue.subscribe();
        queue.close();

        assert!(drain_messages(&rx, &list).finish);
    }

    #[test]
    fn test_requests_applied_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.mp4");
        let b = dir.path().join("b.mkv");
        File::create(&a).unwrap();
        File::create(&b).unwrap();

        let list = Arc::new(Mutex::new(MediaList::new()));
        let mut queue = RequestQueue::new(Arc::clone(&list));
        let rx = queue.subscribe();

        for path in [&a, &b, &a] {
            queue.send(Some(ConvertRequest::convert_media(vec![MediaFileToConvert {
                input_file_path: path.display().to_string(),
                output_file_path: String::new(),
                can_use_sound: true,
            }])));
        }
        queue.close();

        assert!(rx.try_iter().next().is_none());
        let snapshot = list.lock().unwrap().snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].input_path, a);
        assert_eq!(snapshot[1].input_path, b);
    }
}
