//! School-management domain module.
//!
//! Records (schools, classrooms, students, user accounts) and the input
//! validation rules that guard their creation and update. Pure domain logic:
//! no IO, no HTTP, no storage.

pub mod classroom;
pub mod school;
pub mod student;
pub mod user;
pub mod validation;

pub use classroom::{Classroom, ClassroomFields, ClassroomInput};
pub use school::{Address, AddressInput, School, SchoolFields, SchoolInput};
pub use student::{NewStudentFields, Student, StudentFields, StudentInput};
pub use user::{Credentials, LoginInput, NewUserFields, UserAccount, UserInput, UserView};
pub use validation::{Validator, parse_id};
