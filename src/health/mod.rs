use crate::error::ModelError;

#[async_trait::async_trait]
pub trait HealthProvider {
    async fn health_check(&self) -> Result<(), ModelError> {
        Err(ModelError::Generic(
            "health check not implemented for this provider".to_string(),
        ))
    }
}
