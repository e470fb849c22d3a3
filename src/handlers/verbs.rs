//! GET / PUT / PATCH / DELETE.

use super::{message, try_execute, NULL_DTO};
use crate::entity::Record;
use crate::error::AppError;
use crate::response::Outcome;
use crate::store::EntityRepository;
use uuid::Uuid;

pub const GET_ERROR: &str = "Errore durante l'operazione GET: ";
pub const PUT_ERROR: &str = "Errore durante l'inserimento: ";
pub const PATCH_ERROR: &str = "Errore durante l'esecuzione dell'upsert: ";
pub const DELETE_ERROR: &str = "Errore durante l'eliminazione: ";

pub async fn handle_get(id: Uuid, repo: &dyn EntityRepository) -> Outcome {
    try_execute(GET_ERROR, || async move {
        let record = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Id not found".into()))?;
        Ok::<_, AppError>(serde_json::to_value(record).map_err(|e| AppError::Validation(e.to_string()))?)
    })
    .await
}

/// `None` is a payload that failed to cast; it is rejected before touching the store.
pub async fn handle_put(record: Option<Record>, repo: &dyn EntityRepository) -> Outcome {
    let Some(record) = record else {
        return Outcome::error(NULL_DTO);
    };
    try_execute(PUT_ERROR, || async move {
        let id = repo.insert(&record).await?;
        Ok::<_, AppError>(message(format!("Inserimento completato id: {}", id)))
    })
    .await
}

/// Upsert: read first, then exactly one of update or insert. Not atomic.
pub async fn handle_patch(record: Option<Record>, repo: &dyn EntityRepository) -> Outcome {
    let Some(record) = record else {
        return Outcome::error(NULL_DTO);
    };
    try_execute(PATCH_ERROR, || async move {
        match repo.get_by_id(record.id).await? {
            Some(_) => repo.update(&record).await?,
            None => repo.insert(&record).await?,
        };
        Ok::<_, AppError>(message(format!("Upsert completata id: {}", record.id)))
    })
    .await
}

pub async fn handle_delete(id: Uuid, repo: &dyn EntityRepository) -> Outcome {
    try_execute(DELETE_ERROR, || async move {
        let id = repo.delete(id).await?;
        Ok::<_, AppError>(message(format!("Record eliminato id: {}", id)))
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryRepository;

    #[tokio::test]
    async fn get_missing_reports_not_found() {
        let repo = MemoryRepository::new("T_Dto");
        let out = handle_get(Uuid::new_v4(), &repo).await;
        assert_eq!(out.error_message(), Some("Errore durante l'operazione GET: Id not found"));
    }

    #[tokio::test]
    async fn get_returns_record() {
        let repo = MemoryRepository::new("T_Dto");
        let r = Record::new(Some("hello".into()));
        repo.insert(&r).await.unwrap();
        let out = handle_get(r.id, &repo).await;
        let v = out.result_value().unwrap();
        assert_eq!(v["descr"], "hello");
        assert_eq!(v["id"], r.id.to_string());
    }

    #[tokio::test]
    async fn put_null_dto_does_not_reach_store() {
        let repo = MemoryRepository::new("T_Dto");
        let out = handle_put(None, &repo).await;
        assert_eq!(out.error_message(), Some(NULL_DTO));
        assert_eq!(repo.total_calls(), 0);
    }

    #[tokio::test]
    async fn put_duplicate_is_prefixed_error() {
        let repo = MemoryRepository::new("T_Dto");
        let r = Record::new(None);
        handle_put(Some(r.clone()), &repo).await;
        let out = handle_put(Some(r), &repo).await;
        assert!(out.error_message().unwrap().starts_with(PUT_ERROR));
    }

    #[tokio::test]
    async fn patch_inserts_then_updates() {
        let repo = MemoryRepository::new("T_Dto");
        let mut r = Record::new(Some("v1".into()));
        let first = handle_patch(Some(r.clone()), &repo).await;
        assert!(!first.is_error());
        assert_eq!(repo.calls("insert"), 1);
        assert_eq!(repo.calls("update"), 0);

        r.descr = Some("v2".into());
        let second = handle_patch(Some(r.clone()), &repo).await;
        assert_eq!(
            second.result_value().unwrap()["message"],
            format!("Upsert completata id: {}", r.id)
        );
        assert_eq!(repo.calls("insert"), 1);
        assert_eq!(repo.calls("update"), 1);
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.get_by_id(r.id).await.unwrap().unwrap().descr.as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn delete_absent_confirms() {
        let repo = MemoryRepository::new("T_Dto");
        let id = Uuid::new_v4();
        let out = handle_delete(id, &repo).await;
        assert_eq!(
            out.result_value().unwrap()["message"],
            format!("Record eliminato id: {}", id)
        );
    }
}
