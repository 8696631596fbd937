use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info};

use crate::convertable_media::ConvertableMedia;
use crate::fstools::{default_output_path, file_extension, is_readable_file};
use crate::mime::{mime_type_from_extension, top_level_type, MediaType};
use crate::request::{ConvertRequest, MediaFileToConvert, CONVERT_MEDIA_ACTION};

pub type SharedMedia = Arc<Mutex<ConvertableMedia>>;

/// Locks an item, recovering the data if a previous holder panicked.
pub fn lock_media(media: &SharedMedia) -> MutexGuard<'_, ConvertableMedia> {
    media.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct MediaList {
    hashmap: HashMap<PathBuf, SharedMedia>,
    items: Vec<SharedMedia>,
}

impl MediaList {
    pub fn new() -> Self {
        MediaList {
            hashmap: HashMap::new(),
            items: vec![],
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<SharedMedia> {
        self.items.get(index).map(Arc::clone)
    }

    pub fn find(&self, input_path: &PathBuf) -> Option<SharedMedia> {
        self.hashmap.get(input_path).map(Arc::clone)
    }

    pub fn snapshot(&self) -> Vec<ConvertableMedia> {
        self.items.iter().map(|i| lock_media(i).clone()).collect()
    }

    pub fn encodable(&self) -> Vec<SharedMedia> {
        self.items
            .iter()
            .filter(|i| lock_media(i).can_be_encoded())
            .map(Arc::clone)
            .collect()
    }

    /// Applies one inbound request. Returns notices meant for the user.
    pub fn apply_request(&mut self, request: &ConvertRequest) -> Vec<String> {
        if request.action != CONVERT_MEDIA_ACTION {
            return vec![format!("Unknown action: {}", request.action)];
        }

        for media_file in &request.media_files_to_convert {
            self.merge(media_file);
        }

        vec![]
    }

    fn merge(&mut self, media_file: &MediaFileToConvert) {
        let input_path = PathBuf::from(&media_file.input_file_path);
        let output_path = match media_file.output_file_path.trim() {
            "" => default_output_path(&input_path),
            p => PathBuf::from(p),
        };

        let media = match self.find(&input_path) {
            Some(existing) => existing,
            None => self.insert(ConvertableMedia::new(
                input_path.clone(),
                output_path.clone(),
                media_file.can_use_sound,
            )),
        };

        let mut m = lock_media(&media);
        if m.encoding_in_progress() {
            info!("{:?} is being encoded; dropping update", input_path);
            return;
        }

        m.output_path = output_path;
        m.can_use_sound = media_file.can_use_sound;
        m.update_error(None);

        match detect_media_type(&input_path) {
            Ok(media_type) => {
                debug!("{:?} detected as {}", input_path, media_type);
                m.update_media_type(media_type);
            },
            Err(error) => {
                info!("{:?}: {}", input_path, error);
                m.update_error(Some(error));
            },
        }
    }

    fn insert(&mut self, media: ConvertableMedia) -> SharedMedia {
        let key = media.input_path.clone();
        let shared = Arc::new(Mutex::new(media));
        self.hashmap.insert(key, Arc::clone(&shared));
        self.items.push(Arc::clone(&shared));
        shared
    }
}

impl Default for MediaList {
    fn default() -> Self {
        MediaList::new()
    }
}

fn detect_media_type(input_path: &PathBuf) -> Result<MediaType, String> {
    if !is_readable_file(input_path) {
        return Err(String::from("Input file is inaccessible"));
    }

    let extension = file_extension(input_path);
    let mime_type = match mime_type_from_extension(&extension) {
        Some(mime_type) if !extension.trim().is_empty() => mime_type,
        _ => return Err(format!(
            "Cannot figure out the mime type of the file by its extension \
             (Only Video and Image are supported), extension: '{}'",
            extension)),
    };

    MediaType::from_mime_type(mime_type)
        .ok_or_else(|| format!("Unsupported media type: '{}'", top_level_type(mime_type)))
}
