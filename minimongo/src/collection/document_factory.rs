use crate::collection::{Body, Document, IdGenerator, ObjectId};
use crate::common::DOC_ID;
use crate::errors::MongoResult;

/// Turns caller supplied bodies into [Document]s with fresh identifiers.
///
/// A body that already carries an `objectId` keeps it; this is how a
/// document taken out of one collection is re-inserted with its identity.
/// Any other value under `objectId` is a type mismatch.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
pub struct DocumentFactory {
    id_generator: IdGenerator,
}

impl DocumentFactory {
    pub fn new() -> Self {
        DocumentFactory::with_generator(IdGenerator::new())
    }

    pub fn with_generator(id_generator: IdGenerator) -> Self {
        DocumentFactory { id_generator }
    }

    pub fn new_document(&mut self, body: Body) -> MongoResult<Document> {
        let id = match body.get(DOC_ID) {
            Some(value) => {
                let id = ObjectId::try_from(value)?;
                self.id_generator.advance_past(&id);
                id
            }
            None => self.id_generator.next_id()?,
        };
        Ok(Document::new(id, Some(body)))
    }
}
