//! LMDB implementation of UserStore.

use outlast_store::user::{User, UserStore};
use outlast_store::StoreError;
use outlast_types::{Fid, Timestamp};

use crate::environment::LmdbStore;
use crate::keys::user_key;
use crate::LmdbError;

impl LmdbStore {
    fn read_user(&self, fid: Fid) -> Result<User, LmdbError> {
        let rtxn = self.env.read_txn()?;
        let bytes = self
            .users_db
            .get(&rtxn, &user_key(fid))?
            .ok_or_else(|| LmdbError::NotFound(format!("user {fid}")))?;
        Ok(bincode::deserialize(bytes)?)
    }

    fn write_user(&self, user: &User) -> Result<(), LmdbError> {
        let bytes = bincode::serialize(user)?;
        let mut wtxn = self.env.write_txn()?;
        self.users_db.put(&mut wtxn, &user_key(user.fid), &bytes)?;
        wtxn.commit()?;
        Ok(())
    }
}

impl UserStore for LmdbStore {
    fn get_user(&self, fid: Fid) -> Result<User, StoreError> {
        Ok(self.read_user(fid)?)
    }

    fn put_user(&self, user: &User) -> Result<(), StoreError> {
        Ok(self.write_user(user)?)
    }

    fn user_exists(&self, fid: Fid) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let found = self
            .users_db
            .get(&rtxn, &user_key(fid))
            .map_err(LmdbError::from)?
            .is_some();
        Ok(found)
    }

    fn touch_last_active(&self, fid: Fid, now: Timestamp) -> Result<(), StoreError> {
        let mut user = self.read_user(fid)?;
        user.last_active = now;
        Ok(self.write_user(&user)?)
    }

    fn set_nft_verified(&self, fid: Fid, verified: bool, now: Timestamp) -> Result<(), StoreError> {
        let mut user = self.read_user(fid)?;
        user.nft_verified = verified;
        user.last_nft_check = Some(now);
        Ok(self.write_user(&user)?)
    }
}
