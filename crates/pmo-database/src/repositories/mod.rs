//! Repositories for every back-office entity.
//!
//! All of them are the same [`EntityRepository`]; the aliases only name
//! the entity type.

pub mod generic;

pub use generic::EntityRepository;

use pmo_entity::activity::Activity;
use pmo_entity::client::Client;
use pmo_entity::machine::Machine;
use pmo_entity::project::Project;
use pmo_entity::task::ProjectTask;
use pmo_entity::user::User;

/// Repository for projects.
pub type ProjectRepository = EntityRepository<Project>;
/// Repository for tasks.
pub type TaskRepository = EntityRepository<ProjectTask>;
/// Repository for logged activities.
pub type ActivityRepository = EntityRepository<Activity>;
/// Repository for clients.
pub type ClientRepository = EntityRepository<Client>;
/// Repository for machines.
pub type MachineRepository = EntityRepository<Machine>;
/// Repository for users.
pub type UserRepository = EntityRepository<User>;
