//! gRPC service implementations wrapping the core stores and services
//!
//! The acting user is resolved from `x-user-id` request metadata against the
//! user store; session issuance itself happens upstream of this server.

use crate::convert::{
    agenda_status_from_proto, agenda_to_proto, disposition_status_from_proto,
    disposition_to_proto, document_to_proto, document_type_from_proto, event_type_from_proto,
    from_proto_timestamp, notification_to_proto, priority_from_proto, to_proto_timestamp,
    user_to_proto,
};
use siap_core::dashboard;
use siap_core::types::{
    Actor, AgendaId, AgendaPatch, DispositionId, DocumentId, DocumentType, EventType, NewAgenda,
    NewDisposition, NewDocument, NotificationId, Priority, RequestMeta, UserId,
};
use siap_core::{
    AgendaService, AgendaStore, DispositionStore, DispositionWorkflow, DocumentService,
    DocumentStore, HealthStatus, NotificationStore, SiapError, UserStore,
};
use siap_grpc as pb;
use std::sync::Arc;
use tonic::{Request, Response, Status};
use uuid::Uuid;

const DEFAULT_PAGE_LIMIT: usize = 50;

/// Wrapper struct implementing all gRPC services
#[derive(Clone)]
pub struct OfficeGrpc {
    users: UserStore,
    agenda_store: AgendaStore,
    disposition_store: DispositionStore,
    document_store: DocumentStore,
    notification_store: NotificationStore,
    agendas: Arc<AgendaService>,
    documents: Arc<DocumentService>,
    workflow: Arc<DispositionWorkflow>,
}

impl OfficeGrpc {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: UserStore,
        agenda_store: AgendaStore,
        disposition_store: DispositionStore,
        document_store: DocumentStore,
        notification_store: NotificationStore,
        agendas: Arc<AgendaService>,
        documents: Arc<DocumentService>,
        workflow: Arc<DispositionWorkflow>,
    ) -> Self {
        Self {
            users,
            agenda_store,
            disposition_store,
            document_store,
            notification_store,
            agendas,
            documents,
            workflow,
        }
    }

    /// Resolve the caller from request metadata. Every read and mutation
    /// except health checks requires a known user.
    fn resolve_actor<T>(&self, request: &Request<T>) -> Result<(Actor, RequestMeta), Status> {
        let metadata = request.metadata();
        let user_id = metadata
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or_else(|| Status::unauthenticated("Missing or invalid x-user-id metadata"))?;

        let user = self
            .users
            .get(UserId::new(user_id))
            .map_err(to_status)?
            .ok_or_else(|| Status::unauthenticated(format!("Unknown user {}", user_id)))?;

        let meta = RequestMeta {
            ip_address: request.remote_addr().map(|addr| addr.ip().to_string()),
            user_agent: metadata
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .map(String::from),
        };

        Ok((Actor::for_user(&user), meta))
    }
}

fn to_status(error: SiapError) -> Status {
    match error {
        SiapError::NotFound(msg) => Status::not_found(msg),
        SiapError::Validation(msg) => Status::invalid_argument(msg),
        SiapError::Auth(msg) => Status::permission_denied(msg),
        SiapError::InvalidTransition { .. } => Status::failed_precondition(error.to_string()),
        SiapError::Config(msg) => Status::failed_precondition(msg),
        SiapError::StorageUnavailable(msg) => Status::unavailable(msg),
        other => Status::internal(other.to_string()),
    }
}

fn page_window(page: Option<pb::PageRequest>) -> (usize, usize) {
    let page = page.unwrap_or_default();
    let limit = if page.limit == 0 {
        DEFAULT_PAGE_LIMIT
    } else {
        page.limit as usize
    };
    (limit, page.offset as usize)
}

#[tonic::async_trait]
impl pb::AgendaService for OfficeGrpc {
    async fn list(
        &self,
        request: Request<pb::ListAgendasRequest>,
    ) -> Result<Response<pb::ListAgendasResponse>, Status> {
        self.resolve_actor(&request)?;
        let (limit, offset) = page_window(request.into_inner().page);

        let agendas = self
            .agenda_store
            .list(limit, offset)
            .map_err(to_status)?
            .into_iter()
            .map(agenda_to_proto)
            .collect();

        Ok(Response::new(pb::ListAgendasResponse { agendas }))
    }

    async fn get_by_id(
        &self,
        request: Request<pb::GetAgendaRequest>,
    ) -> Result<Response<pb::Agenda>, Status> {
        self.resolve_actor(&request)?;
        let id = AgendaId::new(request.into_inner().id);

        let agenda = self
            .agenda_store
            .get(id)
            .map_err(to_status)?
            .ok_or_else(|| Status::not_found(format!("Agenda {} not found", id)))?;

        Ok(Response::new(agenda_to_proto(agenda)))
    }

    async fn create(
        &self,
        request: Request<pb::CreateAgendaRequest>,
    ) -> Result<Response<pb::Agenda>, Status> {
        let (actor, meta) = self.resolve_actor(&request)?;
        let req = request.into_inner();
        let request_id = Uuid::new_v4();

        if req.title.trim().is_empty() {
            return Err(Status::invalid_argument("Agenda title is required"));
        }
        if req.organizer.trim().is_empty() {
            return Err(Status::invalid_argument("Agenda organizer is required"));
        }
        let event_date = req
            .event_date
            .as_ref()
            .ok_or_else(|| Status::invalid_argument("Agenda event date is required"))?;

        let new = NewAgenda {
            title: req.title,
            description: req.description,
            event_date: from_proto_timestamp(event_date)?,
            event_location: req.event_location,
            event_type: req
                .event_type
                .map(event_type_from_proto)
                .transpose()?
                .unwrap_or(EventType::Meeting),
            organizer: req.organizer,
            attendees: req.attendees,
            notes: req.notes,
        };

        log::info!("[{}] Create agenda requested by user {}", request_id, actor.id);
        let agenda = self
            .agendas
            .create(new, &actor, Some(meta))
            .await
            .map_err(to_status)?;

        Ok(Response::new(agenda_to_proto(agenda)))
    }

    async fn update(
        &self,
        request: Request<pb::UpdateAgendaRequest>,
    ) -> Result<Response<pb::Agenda>, Status> {
        let (actor, meta) = self.resolve_actor(&request)?;
        let req = request.into_inner();
        let request_id = Uuid::new_v4();

        let patch = AgendaPatch {
            title: req.title,
            description: req.description,
            event_date: req
                .event_date
                .as_ref()
                .map(from_proto_timestamp)
                .transpose()?,
            event_location: req.event_location,
            event_type: req.event_type.map(event_type_from_proto).transpose()?,
            organizer: req.organizer,
            attendees: req.replace_attendees.then_some(req.attendees),
            status: req.status.map(agenda_status_from_proto).transpose()?,
            notes: req.notes,
        };

        log::info!(
            "[{}] Update agenda {} requested by user {}",
            request_id,
            req.id,
            actor.id
        );
        let agenda = self
            .agendas
            .update(AgendaId::new(req.id), patch, &actor, Some(meta))
            .await
            .map_err(to_status)?;

        Ok(Response::new(agenda_to_proto(agenda)))
    }

    async fn delete(
        &self,
        request: Request<pb::DeleteAgendaRequest>,
    ) -> Result<Response<pb::DeleteResponse>, Status> {
        let (actor, meta) = self.resolve_actor(&request)?;
        let id = AgendaId::new(request.into_inner().id);
        let request_id = Uuid::new_v4();

        log::info!("[{}] Delete agenda {} requested by user {}", request_id, id, actor.id);
        self.agendas
            .delete(id, &actor, Some(meta))
            .await
            .map_err(to_status)?;

        Ok(Response::new(pb::DeleteResponse { success: true }))
    }
}

#[tonic::async_trait]
impl pb::DispositionService for OfficeGrpc {
    async fn list(
        &self,
        request: Request<pb::ListDispositionsRequest>,
    ) -> Result<Response<pb::ListDispositionsResponse>, Status> {
        self.resolve_actor(&request)?;
        let (limit, offset) = page_window(request.into_inner().page);

        let dispositions = self
            .disposition_store
            .list(limit, offset)
            .map_err(to_status)?
            .into_iter()
            .map(disposition_to_proto)
            .collect();

        Ok(Response::new(pb::ListDispositionsResponse { dispositions }))
    }

    async fn get_by_id(
        &self,
        request: Request<pb::GetDispositionRequest>,
    ) -> Result<Response<pb::Disposition>, Status> {
        self.resolve_actor(&request)?;
        let id = DispositionId::new(request.into_inner().id);

        let disposition = self
            .disposition_store
            .get(id)
            .map_err(to_status)?
            .ok_or_else(|| Status::not_found(format!("Disposition {} not found", id)))?;

        Ok(Response::new(disposition_to_proto(disposition)))
    }

    async fn create(
        &self,
        request: Request<pb::CreateDispositionRequest>,
    ) -> Result<Response<pb::Disposition>, Status> {
        let (actor, meta) = self.resolve_actor(&request)?;
        let req = request.into_inner();
        let request_id = Uuid::new_v4();

        if req.document_title.trim().is_empty() {
            return Err(Status::invalid_argument("Document title is required"));
        }

        let new = NewDisposition {
            agenda_id: AgendaId::new(req.agenda_id),
            document_title: req.document_title,
            document_number: req.document_number,
            description: req.description,
            priority: req
                .priority
                .map(priority_from_proto)
                .transpose()?
                .unwrap_or(Priority::Medium),
            assigned_to: req.assigned_to.map(UserId::new),
            approval_required: req.approval_required,
            due_date: req.due_date.as_ref().map(from_proto_timestamp).transpose()?,
        };

        log::info!(
            "[{}] Create disposition requested by user {}",
            request_id,
            actor.id
        );
        let disposition = self
            .workflow
            .create(new, &actor, Some(meta))
            .await
            .map_err(to_status)?;

        Ok(Response::new(disposition_to_proto(disposition)))
    }

    async fn update_status(
        &self,
        request: Request<pb::UpdateDispositionStatusRequest>,
    ) -> Result<Response<pb::Disposition>, Status> {
        let (actor, meta) = self.resolve_actor(&request)?;
        let req = request.into_inner();
        let request_id = Uuid::new_v4();

        let id = DispositionId::new(req.id);
        let new_status = disposition_status_from_proto(req.status)?;

        log::info!(
            "[{}] Disposition {} status change to {} requested by user {}",
            request_id,
            id,
            new_status,
            actor.id
        );

        let outcome = self
            .workflow
            .transition_status(id, new_status, req.approval_notes, &actor, Some(meta))
            .await
            .map_err(to_status)?;

        // The transition is committed; the audit gap is operator-facing only
        if let Some(audit_error) = &outcome.audit_error {
            log::error!(
                "[{}] Transition of disposition {} committed but audit write failed: {}",
                request_id,
                id,
                audit_error
            );
        }

        Ok(Response::new(disposition_to_proto(outcome.disposition)))
    }

    async fn delete(
        &self,
        request: Request<pb::DeleteDispositionRequest>,
    ) -> Result<Response<pb::DeleteResponse>, Status> {
        let (actor, meta) = self.resolve_actor(&request)?;
        let id = DispositionId::new(request.into_inner().id);
        let request_id = Uuid::new_v4();

        log::info!(
            "[{}] Delete disposition {} requested by user {}",
            request_id,
            id,
            actor.id
        );
        self.workflow
            .delete(id, &actor, Some(meta))
            .await
            .map_err(to_status)?;

        Ok(Response::new(pb::DeleteResponse { success: true }))
    }
}

#[tonic::async_trait]
impl pb::DocumentService for OfficeGrpc {
    async fn list(
        &self,
        request: Request<pb::ListDocumentsRequest>,
    ) -> Result<Response<pb::ListDocumentsResponse>, Status> {
        self.resolve_actor(&request)?;
        let (limit, offset) = page_window(request.into_inner().page);

        let documents = self
            .document_store
            .list(limit, offset)
            .map_err(to_status)?
            .into_iter()
            .map(document_to_proto)
            .collect();

        Ok(Response::new(pb::ListDocumentsResponse { documents }))
    }

    async fn get_by_id(
        &self,
        request: Request<pb::GetDocumentRequest>,
    ) -> Result<Response<pb::Document>, Status> {
        self.resolve_actor(&request)?;
        let id = DocumentId::new(request.into_inner().id);

        let document = self
            .document_store
            .get(id)
            .map_err(to_status)?
            .ok_or_else(|| Status::not_found(format!("Document {} not found", id)))?;

        Ok(Response::new(document_to_proto(document)))
    }

    async fn register(
        &self,
        request: Request<pb::RegisterDocumentRequest>,
    ) -> Result<Response<pb::Document>, Status> {
        let (actor, meta) = self.resolve_actor(&request)?;
        let req = request.into_inner();
        let request_id = Uuid::new_v4();

        if req.file_name.trim().is_empty() || req.file_key.trim().is_empty() {
            return Err(Status::invalid_argument(
                "Document file name and storage key are required",
            ));
        }

        let new = NewDocument {
            agenda_id: req.agenda_id.map(AgendaId::new),
            disposition_id: req.disposition_id.map(DispositionId::new),
            file_name: req.file_name,
            file_key: req.file_key,
            file_url: req.file_url,
            file_type: req.file_type,
            file_size: req.file_size,
            document_type: req
                .document_type
                .map(document_type_from_proto)
                .transpose()?
                .unwrap_or(DocumentType::Other),
        };

        log::info!("[{}] Register document requested by user {}", request_id, actor.id);
        let document = self
            .documents
            .register(new, &actor, Some(meta))
            .map_err(to_status)?;

        Ok(Response::new(document_to_proto(document)))
    }

    async fn delete(
        &self,
        request: Request<pb::DeleteDocumentRequest>,
    ) -> Result<Response<pb::DeleteResponse>, Status> {
        let (actor, meta) = self.resolve_actor(&request)?;
        let id = DocumentId::new(request.into_inner().id);
        let request_id = Uuid::new_v4();

        log::info!("[{}] Delete document {} requested by user {}", request_id, id, actor.id);
        self.documents
            .delete(id, &actor, Some(meta))
            .map_err(to_status)?;

        Ok(Response::new(pb::DeleteResponse { success: true }))
    }
}

#[tonic::async_trait]
impl pb::NotificationService for OfficeGrpc {
    async fn list(
        &self,
        request: Request<pb::ListNotificationsRequest>,
    ) -> Result<Response<pb::ListNotificationsResponse>, Status> {
        let (actor, _) = self.resolve_actor(&request)?;
        let (limit, offset) = page_window(request.into_inner().page);

        let notifications = self
            .notification_store
            .list_for_user(actor.id, limit, offset)
            .map_err(to_status)?
            .into_iter()
            .map(notification_to_proto)
            .collect();

        Ok(Response::new(pb::ListNotificationsResponse { notifications }))
    }

    async fn mark_as_read(
        &self,
        request: Request<pb::MarkAsReadRequest>,
    ) -> Result<Response<pb::Notification>, Status> {
        self.resolve_actor(&request)?;
        let id = NotificationId::new(request.into_inner().id);

        let notification = self
            .notification_store
            .mark_read(id)
            .map_err(to_status)?
            .ok_or_else(|| Status::not_found(format!("Notification {} not found", id)))?;

        Ok(Response::new(notification_to_proto(notification)))
    }
}

#[tonic::async_trait]
impl pb::DashboardService for OfficeGrpc {
    async fn stats(
        &self,
        request: Request<pb::StatsRequest>,
    ) -> Result<Response<pb::DashboardStats>, Status> {
        self.resolve_actor(&request)?;

        let stats = dashboard::collect_stats(&self.agenda_store, &self.disposition_store)
            .map_err(to_status)?;

        Ok(Response::new(pb::DashboardStats {
            total_agendas: stats.total_agendas as u64,
            upcoming_agendas: stats.upcoming_agendas as u64,
            pending_dispositions: stats.pending_dispositions as u64,
            completed_dispositions: stats.completed_dispositions as u64,
        }))
    }
}

#[tonic::async_trait]
impl pb::AuthService for OfficeGrpc {
    async fn me(&self, request: Request<pb::MeRequest>) -> Result<Response<pb::User>, Status> {
        let (actor, _) = self.resolve_actor(&request)?;

        let user = self
            .users
            .get(actor.id)
            .map_err(to_status)?
            .ok_or_else(|| Status::unauthenticated("Unknown user"))?;

        Ok(Response::new(user_to_proto(user)))
    }

    async fn logout(
        &self,
        _request: Request<pb::LogoutRequest>,
    ) -> Result<Response<pb::LogoutResponse>, Status> {
        // Sessions are issued and revoked by the upstream gateway; the
        // server only acknowledges the request
        Ok(Response::new(pb::LogoutResponse { success: true }))
    }
}

#[tonic::async_trait]
impl pb::Health for OfficeGrpc {
    async fn check(
        &self,
        _request: Request<pb::HealthCheckRequest>,
    ) -> Result<Response<pb::HealthCheckResponse>, Status> {
        let health = self.workflow.health_check().map_err(to_status)?;

        let status = match health.status {
            HealthStatus::Healthy => pb::health_check_response::Status::Healthy,
            HealthStatus::Degraded => pb::health_check_response::Status::Degraded,
        };

        let dispositions_by_status = health
            .counts
            .into_iter()
            .map(|(status, count)| (status.as_str().to_string(), count as u64))
            .collect();

        Ok(Response::new(pb::HealthCheckResponse {
            status: status as i32,
            total_dispositions: health.total_dispositions as u64,
            dispositions_by_status,
            checked_at: Some(to_proto_timestamp(health.checked_at)),
        }))
    }
}
