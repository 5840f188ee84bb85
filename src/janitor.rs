use std::time::Duration;

use log::{debug, info};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::{
    cleaners::{Cleaner, CleanupOptions, CleanupRequest, Outcome},
    err,
    errors::{Error, Result},
    models::ResourceState,
    pool::Pool,
};

// 驱动 acquire -> cleanup -> transition 的主循环。
// 对每种配置的资源类型轮流处理，保证公平；无脏资源时暂停避免空转。
pub struct Janitor<P: Pool> {
    pool: P,
    cleaners: Vec<(String, Box<dyn Cleaner>)>,
    options: CleanupOptions,
    idle_pause: Duration,
}

impl<P: Pool> Janitor<P> {
    pub fn new(
        pool: P,
        cleaners: Vec<(String, Box<dyn Cleaner>)>,
        options: CleanupOptions,
        idle_pause: Duration,
    ) -> Self {
        Janitor {
            pool,
            cleaners,
            options,
            idle_pause,
        }
    }

    // 一直运行到收到停止信号，或遇到不可恢复的错误。
    // 致命错误向上传播，由外部监督进程重启来恢复。
    pub async fn run(&self, shutdown: CancellationToken) -> Result<()> {
        if self.cleaners.is_empty() {
            return err!("no resource types configured");
        }

        loop {
            if self.run_pass(&shutdown).await? {
                info!("Shutdown requested, stopping the janitor loop");
                return Ok(());
            }
        }
    }

    // 单轮：按配置顺序处理每种资源类型。返回 true 表示收到停止信号。
    async fn run_pass(&self, shutdown: &CancellationToken) -> Result<bool> {
        for (rtype, cleaner) in &self.cleaners {
            if shutdown.is_cancelled() {
                return Ok(true);
            }

            let resource = match self
                .pool
                .acquire(rtype, ResourceState::Dirty, ResourceState::Cleaning)
                .await
            {
                Ok(resource) => resource,
                Err(e) if e.is_not_found() => {
                    // 预期的空闲状态：暂停后处理下一种类型
                    info!("No dirty resource acquired for type {rtype}");
                    if self.pause(shutdown).await {
                        return Ok(true);
                    }
                    continue;
                }
                Err(e) => {
                    return Err(Error::Acquire {
                        rtype: rtype.clone(),
                        source: Box::new(e),
                    });
                }
            };

            let name = resource.name.clone();
            debug!(
                "Acquired {} resource {} in state {} (owner: {}, last update: {:?})",
                resource.r#type, resource.name, resource.state, resource.owner, resource.last_update
            );
            let mut request = CleanupRequest::new(resource, &self.options);
            let span = tracing::info_span!("cleanup", resource = %name, resource_type = %rtype);
            match cleaner.clean(&mut request).instrument(span).await {
                Ok(Outcome::Cleaned) => {
                    // 先持久化清理器对 user data 的修改，再发布回池中
                    self.pool
                        .update_one(&name, ResourceState::Cleaning, &request.resource.user_data)
                        .await
                        .map_err(|e| Error::Update {
                            name: name.clone(),
                            source: Box::new(e),
                        })?;
                    self.pool
                        .release_one(&name, ResourceState::Free)
                        .await
                        .map_err(|e| Error::Release {
                            name: name.clone(),
                            source: Box::new(e),
                        })?;
                    info!("Released resource {name}");
                }
                Ok(Outcome::Deferred { reason }) => {
                    // 资源留在 cleaning 状态，等待将来的运行重新处理
                    info!("Skip releasing resource {name}, it will remain dirty: {reason}");
                }
                Err(e) => {
                    return Err(Error::Clean {
                        name,
                        source: Box::new(e),
                    });
                }
            }
        }

        Ok(false)
    }

    // 可被停止信号打断的空闲暂停。返回 true 表示收到停止信号。
    async fn pause(&self, shutdown: &CancellationToken) -> bool {
        tokio::select! {
            _ = shutdown.cancelled() => true,
            _ = tokio::time::sleep(self.idle_pause) => false,
        }
    }
}
