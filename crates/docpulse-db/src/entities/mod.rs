//! Database entities

pub mod activity_log;
pub mod ai_question;
pub mod document;
pub mod document_note;
pub mod group;
pub mod group_member;
pub mod member;
pub mod notification;
pub mod organization;
pub mod read_status;

pub use activity_log::Entity as ActivityLog;
pub use ai_question::Entity as AiQuestion;
pub use document::Entity as Document;
pub use document_note::Entity as DocumentNote;
pub use group::Entity as Group;
pub use group_member::Entity as GroupMember;
pub use member::Entity as Member;
pub use notification::Entity as Notification;
pub use organization::Entity as Organization;
pub use read_status::Entity as ReadStatus;

pub mod prelude {
    pub use super::activity_log::Entity as ActivityLog;
    pub use super::ai_question::Entity as AiQuestion;
    pub use super::document::Entity as Document;
    pub use super::document_note::Entity as DocumentNote;
    pub use super::group::Entity as Group;
    pub use super::group_member::Entity as GroupMember;
    pub use super::member::Entity as Member;
    pub use super::notification::Entity as Notification;
    pub use super::organization::Entity as Organization;
    pub use super::read_status::Entity as ReadStatus;
}
