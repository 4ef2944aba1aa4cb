use crate::error::StateError;
use crate::io::{get_i64, put_i64, StateDecode, StateEncode};
use kestrel_types::NodesConfig;

impl StateEncode for NodesConfig {
    fn encode_state(&self, out: &mut Vec<u8>) {
        put_i64(out, self.min_num_nodes);
        put_i64(out, self.max_num_nodes);
        put_i64(out, self.staked_nodes);
        put_i64(out, self.jailed_nodes);
    }
}

impl StateDecode for NodesConfig {
    fn decode_state(input: &mut &[u8]) -> Result<Self, StateError> {
        let min_num_nodes = get_i64(input)?;
        let max_num_nodes = get_i64(input)?;
        let staked_nodes = get_i64(input)?;
        let jailed_nodes = get_i64(input)?;

        Ok(NodesConfig {
            min_num_nodes,
            max_num_nodes,
            staked_nodes,
            jailed_nodes,
        })
    }
}
