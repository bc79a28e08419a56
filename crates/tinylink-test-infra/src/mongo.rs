use crate::Result;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage};

/// Test fixture for a disposable MongoDB server.
pub struct MongoServer {
    container: ContainerAsync<GenericImage>,
}

impl MongoServer {
    /// Starts a MongoDB container suitable for integration tests.
    pub async fn new() -> Result<Self> {
        let container = GenericImage::new("mongo", "7.0")
            .with_exposed_port(27017_u16.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Waiting for connections"))
            .start()
            .await?;

        Ok(Self { container })
    }

    pub async fn host(&self) -> Result<String> {
        Ok(self.container.get_host().await?.to_string())
    }

    pub async fn port(&self) -> Result<u16> {
        Ok(self.container.get_host_port_ipv4(27017).await?)
    }

    pub async fn uri(&self) -> Result<String> {
        let host = self.host().await?;
        let port = self.port().await?;
        Ok(format!("mongodb://{host}:{port}/?directConnection=true"))
    }

    /// Returns the underlying container reference.
    pub fn container(&self) -> &ContainerAsync<GenericImage> {
        &self.container
    }
}
