pub mod collision;
pub mod cushion;
pub mod friction;
pub mod kinematics;
pub mod knuckle;
pub mod mathaven;
pub mod pocket;
