use serde::{Deserialize, Serialize};

use super::Sub;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UserInfo {
    pub sub: Sub,
    pub name: String,
    pub picture: String,
}
