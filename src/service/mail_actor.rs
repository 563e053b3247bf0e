use crate::error::CareError;
use crate::service::mailer::{MailTransport, OutgoingMail};

use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use tracing::{debug, info, warn};

/// Messages handled by the mailer actor.
pub enum MailerMessage {
    /// Send without waiting; failures are logged.
    Dispatch(OutgoingMail),
    /// Send and report the delivery outcome to the caller.
    Deliver(OutgoingMail, RpcReplyPort<Result<(), CareError>>),
}

/// Handle for queueing mail on the mailer actor.
#[derive(Clone)]
pub struct MailerHandle {
    actor: ActorRef<MailerMessage>,
}

impl MailerHandle {
    /// Queue a mail for background delivery. Registration must not fail on mail errors.
    pub fn dispatch(&self, mail: OutgoingMail) {
        let to = mail.to.clone();
        if let Err(e) = ractor::cast!(self.actor, MailerMessage::Dispatch(mail)) {
            warn!(to = %to, error = %e, "mailer actor unreachable; mail dropped");
        }
    }

    /// Deliver a mail and wait for the transport's answer.
    pub async fn deliver(&self, mail: OutgoingMail) -> Result<(), CareError> {
        ractor::call!(self.actor, MailerMessage::Deliver, mail)
            .map_err(|e| CareError::RactorError(format!("Deliver RPC failed: {e}")))?
    }
}

struct MailerState {
    transport: MailTransport,
}

struct MailerActor;

#[ractor::async_trait]
impl Actor for MailerActor {
    type Msg = MailerMessage;
    type State = MailerState;
    type Arguments = MailTransport;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        transport: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let kind = match transport {
            MailTransport::Log => "log",
            MailTransport::Relay { .. } => "relay",
        };
        info!(transport = kind, "MailerActor started");
        Ok(MailerState { transport })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        // Delivery runs off the actor so one slow relay call does not hold up the queue.
        let transport = state.transport.clone();
        match message {
            MailerMessage::Dispatch(mail) => {
                tokio::spawn(async move {
                    match transport.send(&mail).await {
                        Ok(()) => debug!(to = %mail.to, "mail dispatched"),
                        Err(e) => warn!(to = %mail.to, error = %e, "failed to send mail"),
                    }
                });
            }
            MailerMessage::Deliver(mail, reply) => {
                tokio::spawn(async move {
                    let res = transport.send(&mail).await;
                    if let Err(e) = &res {
                        warn!(to = %mail.to, error = %e, "failed to deliver mail");
                    }
                    let _ = reply.send(res);
                });
            }
        }
        Ok(())
    }
}

/// Spawn the mailer actor and return a handle.
pub async fn spawn(transport: MailTransport) -> Result<MailerHandle, CareError> {
    let (actor, _jh) = Actor::spawn(None, MailerActor, transport)
        .await
        .map_err(|e| CareError::RactorError(format!("failed to spawn MailerActor: {e}")))?;
    Ok(MailerHandle { actor })
}
