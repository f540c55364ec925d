pub mod alert;
pub mod education_content;
pub mod mark;
pub mod school;
pub mod student;
pub mod user;

pub use alert::Entity as Alert;
pub use education_content::Entity as EducationContent;
pub use mark::Entity as Mark;
pub use school::Entity as School;
pub use student::Entity as Student;
pub use user::Entity as User;

pub mod prelude;
