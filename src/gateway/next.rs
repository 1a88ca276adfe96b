use super::handler::HandlerService;
use crate::{
    http::{Request, Response},
    Result,
};

/// Continuation bound to every frame after the current middleware.
pub struct Next {
    handler: HandlerService,
}

impl Next {
    pub(crate) fn new(handler: HandlerService) -> Self {
        Self { handler }
    }

    pub async fn run(self, request: Request) -> Result<Response> {
        self.handler.call(request).await
    }
}
