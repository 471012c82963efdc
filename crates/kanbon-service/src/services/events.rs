//! Domain event dispatch
//!
//! Events are dispatched after the write that produced them has completed.

use kanbon_core::events::{AddressClaimedEvent, DomainEvent};
use kanbon_core::{MessageSource, Snowflake};
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::system_message::SystemMessageService;

pub struct EventDispatcher<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EventDispatcher<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, event), fields(event_type = event.event_type()))]
    pub async fn dispatch(&self, event: DomainEvent) -> ServiceResult<()> {
        match event {
            DomainEvent::AddressClaimed(claim) => {
                self.on_address_claimed(&claim).await?;
            }
        }
        Ok(())
    }

    /// Release the address from every other account still waiting to verify
    /// it, and tell each of them. Returns the released accounts.
    async fn on_address_claimed(&self, claim: &AddressClaimedEvent) -> ServiceResult<Vec<Snowflake>> {
        let released = self
            .ctx
            .account_repo()
            .release_pending_address(claim.kind, &claim.address, claim.claimant_id)
            .await?;

        let messages = SystemMessageService::new(self.ctx);
        let args = [claim.address.clone()];
        for account_id in &released {
            messages
                .add(
                    *account_id,
                    MessageSource::template(claim.kind.removal_template()),
                    &args,
                )
                .await?;
        }

        if !released.is_empty() {
            info!(
                kind = %claim.kind,
                claimant_id = %claim.claimant_id,
                released = released.len(),
                "Pending address released from other accounts"
            );
        }
        Ok(released)
    }
}
