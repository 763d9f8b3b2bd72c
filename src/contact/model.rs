use serde::{Deserialize, Serialize};

use crate::user;

use super::{Id, Status, StatusTransition};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Contact {
    id: Id,
    sub1: user::Sub,
    sub2: user::Sub,
    status: Status,
    created_at: i64,
}

impl Contact {
    pub fn new(initiator: user::Sub, recipient: user::Sub) -> Self {
        Self {
            id: Id::random(),
            sub1: initiator.clone(),
            sub2: recipient,
            status: Status::Pending { initiator },
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn sub1(&self) -> &user::Sub {
        &self.sub1
    }

    pub fn sub2(&self) -> &user::Sub {
        &self.sub2
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn involves(&self, sub: &user::Sub) -> bool {
        self.sub1.eq(sub) || self.sub2.eq(sub)
    }

    /// Applies a status transition if it is legal from the current state.
    /// Only the non-initiating member may respond to a pending request.
    pub fn transition(&mut self, t: StatusTransition<'_>) -> bool {
        let next = match (&self.status, t) {
            (Status::Pending { initiator }, StatusTransition::Accept { responder })
                if initiator.ne(responder) && self.involves(responder) =>
            {
                Some(Status::Accepted)
            }
            (Status::Pending { initiator }, StatusTransition::Reject { responder })
                if initiator.ne(responder) && self.involves(responder) =>
            {
                Some(Status::Rejected)
            }
            _ => None,
        };

        match next {
            Some(status) => {
                self.status = status;
                true
            }
            None => false,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ContactDto {
    pub id: Id,
    pub recipient: user::Sub,
    pub status: Status,
}

impl ContactDto {
    pub fn new(auth_sub: &user::Sub, c: &Contact) -> Self {
        let recipient = if auth_sub.eq(c.sub1()) {
            c.sub2()
        } else {
            c.sub1()
        };

        Self {
            id: *c.id(),
            recipient: recipient.clone(),
            status: c.status().clone(),
        }
    }
}
