use std::sync::Arc;

use crate::application::content::ContentService;
use crate::application::documents::DocumentService;

#[derive(Clone)]
pub struct ApiState {
    pub content: Arc<ContentService>,
    pub documents: Arc<DocumentService>,
}
