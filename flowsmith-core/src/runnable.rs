use async_trait::async_trait;

use crate::FlowsmithError;

#[async_trait]
pub trait Runnable<Input: Send + 'static, Output: Send + 'static> {
    async fn invoke(&self, input: Input) -> Result<Output, FlowsmithError>;
}

#[async_trait]
impl<Input, Output, R> Runnable<Input, Output> for std::sync::Arc<R>
where
    Input: Send + 'static,
    Output: Send + 'static,
    R: Runnable<Input, Output> + Send + Sync + ?Sized,
{
    async fn invoke(&self, input: Input) -> Result<Output, FlowsmithError> {
        (**self).invoke(input).await
    }
}
