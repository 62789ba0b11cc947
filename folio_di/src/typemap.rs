use std::{
    any::{Any, TypeId},
    collections::HashMap,
};

/// Map holding at most one value per type.
#[derive(Debug, Default)]
pub struct TypeMap {
    values: HashMap<TypeId, Box<dyn Any>>,
}

impl TypeMap {
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.values.get(&TypeId::of::<T>())?.downcast_ref()
    }

    /// Insert `value`, returning the value of the same type it replaced.
    pub fn insert<T: 'static>(&mut self, value: T) -> Option<T> {
        let previous = self.values.insert(TypeId::of::<T>(), Box::new(value))?;
        previous.downcast().ok().map(|previous| *previous)
    }
}
