use crate::errors::NewsResult;

#[cfg_attr(test, mockall::automock)]
pub trait PreferenceRepository: Send + Sync {
    fn get(&self, key: &str) -> NewsResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> NewsResult<()>;
    fn remove(&self, key: &str) -> NewsResult<()>;
}
