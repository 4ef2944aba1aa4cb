use crate::error::StateError;
use crate::io::{get_u32, get_var_bytes, put_u32, put_var_bytes, StateDecode, StateEncode};
use kestrel_types::{WaitingListElement, WaitingListHead};

impl StateEncode for WaitingListHead {
    fn encode_state(&self, out: &mut Vec<u8>) {
        put_var_bytes(out, &self.first_key);
        put_var_bytes(out, &self.last_key);
        put_u32(out, self.length);
        put_var_bytes(out, &self.last_jailed_key);
    }
}

impl StateDecode for WaitingListHead {
    fn decode_state(input: &mut &[u8]) -> Result<Self, StateError> {
        let first_key = get_var_bytes(input)?;
        let last_key = get_var_bytes(input)?;
        let length = get_u32(input)?;
        let last_jailed_key = get_var_bytes(input)?;

        Ok(WaitingListHead {
            first_key,
            last_key,
            length,
            last_jailed_key,
        })
    }
}

impl StateEncode for WaitingListElement {
    fn encode_state(&self, out: &mut Vec<u8>) {
        put_var_bytes(out, &self.bls_key);
        put_var_bytes(out, &self.next_key);
        put_var_bytes(out, &self.previous_key);
    }
}

impl StateDecode for WaitingListElement {
    fn decode_state(input: &mut &[u8]) -> Result<Self, StateError> {
        let bls_key = get_var_bytes(input)?;
        let next_key = get_var_bytes(input)?;
        let previous_key = get_var_bytes(input)?;

        Ok(WaitingListElement {
            bls_key,
            next_key,
            previous_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::decode_all;
    use crate::io::StateEncode;
    use kestrel_types::{WaitingListElement, WaitingListHead};

    #[test]
    fn head_round_trips_with_empty_pointers() {
        let head = WaitingListHead::default();

        let mut bytes = Vec::new();
        head.encode_state(&mut bytes);
        let decoded: WaitingListHead = decode_all(&bytes).expect("decode head");

        assert_eq!(decoded, head);
        assert!(decoded.first_key.is_empty());
        assert_eq!(decoded.length, 0);
    }

    #[test]
    fn element_round_trips_with_links() {
        let element = WaitingListElement {
            bls_key: b"pubKey".to_vec(),
            next_key: b"w_other".to_vec(),
            previous_key: Vec::new(),
        };

        let mut bytes = Vec::new();
        element.encode_state(&mut bytes);
        let decoded: WaitingListElement = decode_all(&bytes).expect("decode element");

        assert_eq!(decoded, element);
    }
}
