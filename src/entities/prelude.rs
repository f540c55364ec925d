pub use super::alert::{AlertKind, Entity as Alert};
pub use super::education_content::Entity as EducationContent;
pub use super::mark::Entity as Mark;
pub use super::school::Entity as School;
pub use super::student::Entity as Student;
pub use super::user::{Entity as User, Role};
