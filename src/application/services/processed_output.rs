use crate::application::ports::{ObjectStore, object_store::ObjectStoreError};
use crate::domain::repositories::{ProcessedDocumentRepository, RepositoryError};
use crate::domain::value_objects::{
    ObjectKey, RawObjectKey,
    object_key::{clean_filename, s3_uri},
};

/// Whether the processed prefix of `raw` is still in use by another upload of
/// the same patient: a document row pointing at the same output, or a live raw
/// object whose filename cleans to the same name.
///
/// Call after the rows belonging to `raw` itself are gone.
pub async fn is_shared<E>(
    object_store: &dyn ObjectStore,
    documents: &dyn ProcessedDocumentRepository,
    bucket: &str,
    raw: &RawObjectKey,
) -> Result<bool, E>
where
    E: From<RepositoryError> + From<ObjectStoreError>,
{
    let output_uri = s3_uri(bucket, &raw.extraction_output_key());
    if documents.count_by_output_uri(&output_uri).await? > 0 {
        return Ok(true);
    }

    let own_key = raw.to_key();
    let clean_name = raw.clean_filename();
    let patient_prefix = format!("{}/", raw.patient_id);
    for key in object_store.list_objects(&patient_prefix).await? {
        if key == own_key {
            continue;
        }
        if let Ok(ObjectKey::Raw(sibling)) = ObjectKey::parse(&key) {
            if sibling.patient_id == raw.patient_id
                && clean_filename(&sibling.filename) == clean_name
            {
                return Ok(true);
            }
        }
    }

    Ok(false)
}

/// Deletes every object under the processed prefix of `raw` unless another
/// upload still maps to it. Returns how many objects were removed.
pub async fn release<E>(
    object_store: &dyn ObjectStore,
    documents: &dyn ProcessedDocumentRepository,
    bucket: &str,
    raw: &RawObjectKey,
) -> Result<usize, E>
where
    E: From<RepositoryError> + From<ObjectStoreError>,
{
    if is_shared::<E>(object_store, documents, bucket, raw).await? {
        return Ok(0);
    }

    let mut deleted = 0;
    for key in object_store.list_objects(&raw.processed_prefix()).await? {
        if object_store.delete_object(&key).await? {
            deleted += 1;
        }
    }
    Ok(deleted)
}
