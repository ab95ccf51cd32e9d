pub mod task;
pub mod user;

pub use task::{NewTask, Task, TaskChange, TaskPatch};
pub use user::{LoginInput, SignupInput, User, UserRecord};
