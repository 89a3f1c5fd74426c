use crate::auth::credential_from_metadata;
use crate::proto::calendar_service_server::CalendarService as CalendarRpc;
use crate::proto::{UploadCalendarRequest, UploadCalendarResponse};
use crate::service::{CalendarService, SUCCESS_MESSAGE, UploadRequest, WireTimestamp};
use std::sync::Arc;
use tonic::{Request, Response, Status};

/// gRPC adapter over [`CalendarService`].
#[derive(Clone)]
pub struct CalendarGrpc {
    service: Arc<CalendarService>,
}

impl CalendarGrpc {
    pub fn new(service: Arc<CalendarService>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl CalendarRpc for CalendarGrpc {
    async fn upload_calendar(
        &self,
        request: Request<UploadCalendarRequest>,
    ) -> Result<Response<UploadCalendarResponse>, Status> {
        let credential = credential_from_metadata(request.metadata()).map(str::to_owned);
        let req = request.into_inner();

        let upload = UploadRequest {
            warehouse_name: req.warehouse_name,
            acceptance_type: req.acceptance_type,
            date: req.date.map(|ts| WireTimestamp {
                seconds: ts.seconds,
                nanos: ts.nanos,
            }),
            coefficient: req.coefficient,
        };

        self.service
            .upload_calendar(credential.as_deref(), upload)
            .await?;

        Ok(Response::new(UploadCalendarResponse {
            message: SUCCESS_MESSAGE.to_string(),
        }))
    }
}
