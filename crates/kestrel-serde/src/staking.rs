use crate::error::StateError;
use crate::io::{
    get_big_uint, get_bool, get_u32, get_u64, get_var_bytes, put_big_uint, put_bool, put_u32,
    put_u64, put_var_bytes, StateDecode, StateEncode,
};
use kestrel_types::StakedData;

impl StateEncode for StakedData {
    fn encode_state(&self, out: &mut Vec<u8>) {
        put_u64(out, self.register_nonce);
        put_bool(out, self.staked);
        put_bool(out, self.jailed);
        put_u64(out, self.unstaked_nonce);
        put_u32(out, self.unstaked_epoch);
        put_var_bytes(out, &self.reward_address);
        put_big_uint(out, &self.stake_value);
        put_u64(out, self.jailed_round);
        put_u64(out, self.jailed_nonce);
        put_u64(out, self.unjailed_nonce);
        put_big_uint(out, &self.slash_value);
        put_bool(out, self.waiting);
    }
}

impl StateDecode for StakedData {
    fn decode_state(input: &mut &[u8]) -> Result<Self, StateError> {
        let register_nonce = get_u64(input)?;
        let staked = get_bool(input)?;
        let jailed = get_bool(input)?;
        let unstaked_nonce = get_u64(input)?;
        let unstaked_epoch = get_u32(input)?;
        let reward_address = get_var_bytes(input)?;
        let stake_value = get_big_uint(input)?;
        let jailed_round = get_u64(input)?;
        let jailed_nonce = get_u64(input)?;
        let unjailed_nonce = get_u64(input)?;
        let slash_value = get_big_uint(input)?;
        let waiting = get_bool(input)?;

        Ok(StakedData {
            register_nonce,
            staked,
            jailed,
            unstaked_nonce,
            unstaked_epoch,
            reward_address,
            stake_value,
            jailed_round,
            jailed_nonce,
            unjailed_nonce,
            slash_value,
            waiting,
        })
    }
}
