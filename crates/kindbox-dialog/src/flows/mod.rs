//! Flujos del namespace de usuario. Cada submódulo declara sus estados y
//! una función `register` que los añade al router.
pub mod home;
pub mod registration;
