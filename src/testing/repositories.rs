use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use pgvector::Vector;
use uuid::Uuid;

use crate::domain::entities::{
    Exam, KnowledgeBaseEntry, Medic, Patient, ProcessedDocument, Reservation, UploadedFile,
};
use crate::domain::repositories::{
    ExamRepository, KnowledgeBaseMatch, KnowledgeBaseRepository, MedicRepository,
    PatientRepository, ProcessedDocumentRepository, RepositoryError, ReservationRepository,
    UploadedFileRepository,
};

#[derive(Default)]
struct Tables {
    patients: BTreeMap<String, Patient>,
    medics: BTreeMap<Uuid, Medic>,
    exams: BTreeMap<Uuid, Exam>,
    reservations: BTreeMap<Uuid, Reservation>,
    uploaded_files: BTreeMap<String, UploadedFile>,
    documents: BTreeMap<Uuid, ProcessedDocument>,
    knowledge_base: HashMap<Uuid, Vec<KnowledgeBaseEntry>>,
}

/// One in-memory database behind every repository trait, so constraints that
/// span tables (slot uniqueness, references, cascades) hold as in Postgres.
#[derive(Default)]
pub struct InMemoryRecords {
    tables: Mutex<Tables>,
}

impl InMemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn knowledge_base_len(&self) -> usize {
        self.tables().knowledge_base.values().map(Vec::len).sum()
    }
}

fn page<T: Clone>(items: impl Iterator<Item = T>, skip: i64, limit: i64) -> Vec<T> {
    items.skip(skip as usize).take(limit as usize).collect()
}

impl Tables {
    fn check_reservation(&self, reservation: &Reservation) -> Result<(), RepositoryError> {
        if !self.patients.contains_key(reservation.patient_id()) {
            return Err(RepositoryError::NotFound(format!(
                "patient {}",
                reservation.patient_id()
            )));
        }
        if !self.medics.contains_key(&reservation.medic_id()) {
            return Err(RepositoryError::NotFound(format!(
                "medic {}",
                reservation.medic_id()
            )));
        }
        if !self.exams.contains_key(&reservation.exam_id()) {
            return Err(RepositoryError::NotFound(format!("exam {}", reservation.exam_id())));
        }
        let slot = reservation.slot();
        if self
            .reservations
            .values()
            .any(|r| r.id() != reservation.id() && r.slot() == slot)
        {
            return Err(RepositoryError::SlotAlreadyBooked(slot));
        }
        Ok(())
    }
}

#[async_trait]
impl PatientRepository for InMemoryRecords {
    async fn save(&self, patient: &Patient) -> Result<(), RepositoryError> {
        let mut tables = self.tables();
        if tables.patients.contains_key(patient.id()) {
            return Err(RepositoryError::Conflict("id already exists".to_string()));
        }
        if tables.patients.values().any(|p| p.email() == patient.email()) {
            return Err(RepositoryError::Conflict("email already exists".to_string()));
        }
        tables.patients.insert(patient.id().to_string(), patient.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Patient>, RepositoryError> {
        Ok(self.tables().patients.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Patient>, RepositoryError> {
        Ok(self
            .tables()
            .patients
            .values()
            .find(|p| p.email() == email)
            .cloned())
    }

    async fn find_all(&self, skip: i64, limit: i64) -> Result<Vec<Patient>, RepositoryError> {
        Ok(page(self.tables().patients.values().cloned(), skip, limit))
    }

    async fn update(&self, patient: &Patient) -> Result<(), RepositoryError> {
        let mut tables = self.tables();
        if tables
            .patients
            .values()
            .any(|p| p.id() != patient.id() && p.email() == patient.email())
        {
            return Err(RepositoryError::Conflict("email already exists".to_string()));
        }
        match tables.patients.get_mut(patient.id()) {
            Some(existing) => {
                *existing = patient.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(format!("patient {}", patient.id()))),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let mut tables = self.tables();
        let removed = tables.patients.remove(id).is_some();
        if removed {
            tables.reservations.retain(|_, r| r.patient_id() != id);
            for document in tables.documents.values_mut() {
                if document.patient_id() == Some(id) {
                    *document = ProcessedDocument::from_database(
                        document.document_id(),
                        None,
                        document.file_id().map(str::to_string),
                        document.extracted_data().clone(),
                        document.s3_uri().to_string(),
                        document.output_uri().to_string(),
                        document.processing_date(),
                    );
                }
            }
        }
        Ok(removed)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        Ok(self.tables().patients.len() as i64)
    }
}

#[async_trait]
impl MedicRepository for InMemoryRecords {
    async fn save(&self, medic: &Medic) -> Result<(), RepositoryError> {
        let mut tables = self.tables();
        if tables
            .medics
            .values()
            .any(|m| m.license_number() == medic.license_number())
        {
            return Err(RepositoryError::Conflict(
                "license_number already exists".to_string(),
            ));
        }
        tables.medics.insert(medic.id(), medic.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Medic>, RepositoryError> {
        Ok(self.tables().medics.get(&id).cloned())
    }

    async fn find_all(&self, skip: i64, limit: i64) -> Result<Vec<Medic>, RepositoryError> {
        Ok(page(self.tables().medics.values().cloned(), skip, limit))
    }

    async fn update(&self, medic: &Medic) -> Result<(), RepositoryError> {
        match self.tables().medics.get_mut(&medic.id()) {
            Some(existing) => {
                *existing = medic.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(format!("medic {}", medic.id()))),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let mut tables = self.tables();
        if tables.reservations.values().any(|r| r.medic_id() == id) {
            return Err(RepositoryError::Restricted(
                "medic is referenced by reservations".to_string(),
            ));
        }
        Ok(tables.medics.remove(&id).is_some())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        Ok(self.tables().medics.len() as i64)
    }
}

#[async_trait]
impl ExamRepository for InMemoryRecords {
    async fn save(&self, exam: &Exam) -> Result<(), RepositoryError> {
        let mut tables = self.tables();
        if tables.exams.values().any(|e| e.name() == exam.name()) {
            return Err(RepositoryError::Conflict("name already exists".to_string()));
        }
        tables.exams.insert(exam.id(), exam.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Exam>, RepositoryError> {
        Ok(self.tables().exams.get(&id).cloned())
    }

    async fn find_all(&self, skip: i64, limit: i64) -> Result<Vec<Exam>, RepositoryError> {
        Ok(page(self.tables().exams.values().cloned(), skip, limit))
    }

    async fn update(&self, exam: &Exam) -> Result<(), RepositoryError> {
        match self.tables().exams.get_mut(&exam.id()) {
            Some(existing) => {
                *existing = exam.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(format!("exam {}", exam.id()))),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let mut tables = self.tables();
        if tables.reservations.values().any(|r| r.exam_id() == id) {
            return Err(RepositoryError::Restricted(
                "exam is referenced by reservations".to_string(),
            ));
        }
        Ok(tables.exams.remove(&id).is_some())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        Ok(self.tables().exams.len() as i64)
    }
}

#[async_trait]
impl ReservationRepository for InMemoryRecords {
    async fn create(&self, reservation: &Reservation) -> Result<(), RepositoryError> {
        let mut tables = self.tables();
        tables.check_reservation(reservation)?;
        tables.reservations.insert(reservation.id(), reservation.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, RepositoryError> {
        Ok(self.tables().reservations.get(&id).cloned())
    }

    async fn find_all(&self, skip: i64, limit: i64) -> Result<Vec<Reservation>, RepositoryError> {
        Ok(page(self.tables().reservations.values().cloned(), skip, limit))
    }

    async fn find_by_patient(&self, patient_id: &str) -> Result<Vec<Reservation>, RepositoryError> {
        Ok(self
            .tables()
            .reservations
            .values()
            .filter(|r| r.patient_id() == patient_id)
            .cloned()
            .collect())
    }

    async fn find_by_medic_and_date(
        &self,
        medic_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, RepositoryError> {
        Ok(self
            .tables()
            .reservations
            .values()
            .filter(|r| r.medic_id() == medic_id && r.date() == date)
            .cloned()
            .collect())
    }

    async fn update(&self, reservation: &Reservation) -> Result<(), RepositoryError> {
        let mut tables = self.tables();
        if !tables.reservations.contains_key(&reservation.id()) {
            return Err(RepositoryError::NotFound(format!(
                "reservation {}",
                reservation.id()
            )));
        }
        tables.check_reservation(reservation)?;
        tables.reservations.insert(reservation.id(), reservation.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.tables().reservations.remove(&id).is_some())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        Ok(self.tables().reservations.len() as i64)
    }
}

#[async_trait]
impl UploadedFileRepository for InMemoryRecords {
    async fn save(&self, file: &UploadedFile) -> Result<(), RepositoryError> {
        let mut tables = self.tables();
        if tables.uploaded_files.contains_key(file.file_id()) {
            return Err(RepositoryError::Conflict("id already exists".to_string()));
        }
        tables
            .uploaded_files
            .insert(file.file_id().to_string(), file.clone());
        Ok(())
    }

    async fn find_by_file_id(&self, file_id: &str) -> Result<Option<UploadedFile>, RepositoryError> {
        Ok(self.tables().uploaded_files.get(file_id).cloned())
    }

    async fn find_by_patient(&self, patient_id: &str) -> Result<Vec<UploadedFile>, RepositoryError> {
        Ok(self
            .tables()
            .uploaded_files
            .values()
            .filter(|f| f.patient_id() == patient_id)
            .cloned()
            .collect())
    }

    async fn update(&self, file: &UploadedFile) -> Result<(), RepositoryError> {
        match self.tables().uploaded_files.get_mut(file.file_id()) {
            Some(existing) => {
                *existing = file.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(format!("file {}", file.file_id()))),
        }
    }

    async fn delete(&self, file_id: &str) -> Result<bool, RepositoryError> {
        Ok(self.tables().uploaded_files.remove(file_id).is_some())
    }
}

#[async_trait]
impl ProcessedDocumentRepository for InMemoryRecords {
    async fn insert_if_absent(&self, document: &ProcessedDocument) -> Result<bool, RepositoryError> {
        let mut tables = self.tables();
        if tables
            .documents
            .values()
            .any(|d| d.s3_uri() == document.s3_uri())
        {
            return Ok(false);
        }
        tables.documents.insert(document.document_id(), document.clone());
        Ok(true)
    }

    async fn find_by_id(
        &self,
        document_id: Uuid,
    ) -> Result<Option<ProcessedDocument>, RepositoryError> {
        Ok(self.tables().documents.get(&document_id).cloned())
    }

    async fn find_by_s3_uri(&self, s3_uri: &str) -> Result<Option<ProcessedDocument>, RepositoryError> {
        Ok(self
            .tables()
            .documents
            .values()
            .find(|d| d.s3_uri() == s3_uri)
            .cloned())
    }

    async fn find_by_file_id(
        &self,
        file_id: &str,
    ) -> Result<Option<ProcessedDocument>, RepositoryError> {
        Ok(self
            .tables()
            .documents
            .values()
            .find(|d| d.file_id() == Some(file_id))
            .cloned())
    }

    async fn find_by_patient(
        &self,
        patient_id: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<ProcessedDocument>, RepositoryError> {
        let tables = self.tables();
        let matching = tables
            .documents
            .values()
            .filter(|d| d.patient_id() == Some(patient_id))
            .cloned();
        Ok(page(matching, skip, limit))
    }

    async fn count_by_patient(&self, patient_id: &str) -> Result<i64, RepositoryError> {
        Ok(self
            .tables()
            .documents
            .values()
            .filter(|d| d.patient_id() == Some(patient_id))
            .count() as i64)
    }

    async fn count_by_output_uri(&self, output_uri: &str) -> Result<i64, RepositoryError> {
        Ok(self
            .tables()
            .documents
            .values()
            .filter(|d| d.output_uri() == output_uri)
            .count() as i64)
    }

    async fn find_all(&self, skip: i64, limit: i64) -> Result<Vec<ProcessedDocument>, RepositoryError> {
        Ok(page(self.tables().documents.values().cloned(), skip, limit))
    }

    async fn delete(&self, document_id: Uuid) -> Result<bool, RepositoryError> {
        let mut tables = self.tables();
        tables.knowledge_base.remove(&document_id);
        Ok(tables.documents.remove(&document_id).is_some())
    }

    async fn delete_by_s3_uri(&self, s3_uri: &str) -> Result<usize, RepositoryError> {
        let mut tables = self.tables();
        let doomed: Vec<Uuid> = tables
            .documents
            .values()
            .filter(|d| d.s3_uri() == s3_uri)
            .map(|d| d.document_id())
            .collect();
        for id in &doomed {
            tables.documents.remove(id);
            tables.knowledge_base.remove(id);
        }
        Ok(doomed.len())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        Ok(self.tables().documents.len() as i64)
    }
}

fn cosine_similarity(a: &Vector, b: &Vector) -> f32 {
    let (a, b) = (a.as_slice(), b.as_slice());
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm = |v: &[f32]| v.iter().map(|x| x * x).sum::<f32>().sqrt();
    let denominator = norm(a) * norm(b);
    if denominator == 0.0 { 0.0 } else { dot / denominator }
}

#[async_trait]
impl KnowledgeBaseRepository for InMemoryRecords {
    async fn replace_for_document(
        &self,
        document_id: Uuid,
        entries: &[KnowledgeBaseEntry],
    ) -> Result<usize, RepositoryError> {
        let mut tables = self.tables();
        if !tables.documents.contains_key(&document_id) {
            return Err(RepositoryError::NotFound(format!("document {}", document_id)));
        }
        tables.knowledge_base.insert(document_id, entries.to_vec());
        Ok(entries.len())
    }

    async fn similarity_search(
        &self,
        query_vector: &Vector,
        limit: i64,
    ) -> Result<Vec<KnowledgeBaseMatch>, RepositoryError> {
        let tables = self.tables();
        let mut matches: Vec<KnowledgeBaseMatch> = tables
            .knowledge_base
            .values()
            .flatten()
            .map(|entry| KnowledgeBaseMatch {
                similarity_score: cosine_similarity(entry.embedding(), query_vector),
                entry: entry.clone(),
            })
            .collect();
        matches.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
        matches.truncate(limit as usize);
        Ok(matches)
    }

    async fn count_by_document(&self, document_id: Uuid) -> Result<i64, RepositoryError> {
        Ok(self
            .tables()
            .knowledge_base
            .get(&document_id)
            .map_or(0, Vec::len) as i64)
    }

    async fn delete_by_document(&self, document_id: Uuid) -> Result<usize, RepositoryError> {
        Ok(self
            .tables()
            .knowledge_base
            .remove(&document_id)
            .map_or(0, |entries| entries.len()))
    }
}
