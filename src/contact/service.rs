use async_trait::async_trait;
use log::error;

use crate::event::model::Notification;
use crate::event::service::EventService;
use crate::user;
use crate::user::model::UserInfo;

use super::model::{Contact, ContactDto};
use super::{Id, Repository, Status, StatusTransition};

#[async_trait]
pub trait ContactService {
    /// Creates a pending request and fans `friend_request_sent` out to the
    /// recipient's live connections.
    async fn create(
        &self,
        initiator: &UserInfo,
        recipient: &user::Sub,
    ) -> super::Result<ContactDto>;

    /// Pending -> accepted; the initiator's live connections learn about the
    /// new friend.
    async fn accept(&self, id: &Id, responder: &UserInfo) -> super::Result<Status>;

    async fn reject(&self, id: &Id, responder: &user::Sub) -> super::Result<Status>;

    async fn pending_count(&self, sub: &user::Sub) -> super::Result<usize>;
}

#[derive(Clone)]
pub struct ContactServiceImpl {
    repo: Repository,
    event_service: EventService,
}

impl ContactServiceImpl {
    pub fn new(repo: Repository, event_service: EventService) -> Self {
        Self {
            repo,
            event_service,
        }
    }
}

#[async_trait]
impl ContactService for ContactServiceImpl {
    async fn create(
        &self,
        initiator: &UserInfo,
        recipient: &user::Sub,
    ) -> super::Result<ContactDto> {
        if initiator.sub.eq(recipient) {
            return Err(super::Error::SelfReference);
        }

        if self.repo.exists(&initiator.sub, recipient).await? {
            return Err(super::Error::AlreadyExists(
                initiator.sub.clone(),
                recipient.clone(),
            ));
        }

        let contact = Contact::new(initiator.sub.clone(), recipient.clone());
        self.repo.insert(&contact).await?;

        if let Err(e) = self
            .event_service
            .publish(
                recipient,
                &Notification::FriendRequestSent {
                    contact_id: *contact.id(),
                    requester: initiator.clone(),
                },
            )
            .await
        {
            error!("failed to publish friend request notification: {e}");
        }

        Ok(ContactDto::new(&initiator.sub, &contact))
    }

    async fn accept(&self, id: &Id, responder: &UserInfo) -> super::Result<Status> {
        let mut contact = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(super::Error::NotFound(*id))?;

        let initiator = match contact.status() {
            Status::Pending { initiator } => initiator.clone(),
            _ => return Err(super::Error::StatusTransitionFailed),
        };

        if !contact.transition(StatusTransition::Accept {
            responder: &responder.sub,
        }) {
            return Err(super::Error::StatusTransitionFailed);
        }
        self.repo.update_status(&contact).await?;

        if let Err(e) = self
            .event_service
            .publish(
                &initiator,
                &Notification::FriendRequestAccepted {
                    contact_id: *contact.id(),
                    new_friend: responder.clone(),
                },
            )
            .await
        {
            error!("failed to publish friend accepted notification: {e}");
        }

        Ok(contact.status().clone())
    }

    async fn reject(&self, id: &Id, responder: &user::Sub) -> super::Result<Status> {
        let mut contact = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(super::Error::NotFound(*id))?;

        if !contact.transition(StatusTransition::Reject { responder }) {
            return Err(super::Error::StatusTransitionFailed);
        }
        self.repo.update_status(&contact).await?;

        Ok(contact.status().clone())
    }

    async fn pending_count(&self, sub: &user::Sub) -> super::Result<usize> {
        self.repo.count_pending_for(sub).await
    }
}
