//! Encoding of ITCH records into comma-separated values (CSV).
//!
//! Each record becomes one text line: the schema's literal type-code letter,
//! then every field in wire order, comma-separated, terminated by a line
//! break. Numeric fields are emitted in decimal, unscaled; fixed-width byte
//! fields are emitted raw, trailing padding included. This is a faithful
//! low-level dump of the wire values, not a human-formatted rendering.

use std::io;

use crate::{
    decode::RecordDecoder,
    record::{
        AddOrderMpidMsg, AddOrderMsg, BrokenTradeMsg, CrossTradeMsg, ImbalanceMsg,
        MarketParticipantPosMsg, OrderCancelMsg, OrderDeleteMsg, OrderExecutedMsg,
        OrderExecutedWithPriceMsg, OrderReplaceMsg, Record, RegShoMsg, RetailPriceImprovementMsg,
        StockDirectoryMsg, SystemEventMsg, TimestampMsg, TradeMsg, TradingActionMsg,
    },
    record_enum::RecordEnum,
    Error, Result,
};

/// Type for encoding files and streams of ITCH records in CSV.
///
/// No header line is written; each schema has its own field list, identified
/// by the type-code letter in the first column.
pub struct Encoder<W>
where
    W: io::Write,
{
    writer: csv::Writer<W>,
}

impl<W> Encoder<W>
where
    W: io::Write,
{
    /// Creates a new [`Encoder`] that will write to `writer`.
    pub fn new(writer: W) -> Self {
        let csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            // each schema has its own field count
            .flexible(true)
            .from_writer(writer);
        Self { writer: csv_writer }
    }

    /// Encodes a single record as one CSV line.
    ///
    /// # Errors
    /// This function returns an error if it's unable to write to the
    /// underlying writer or there's a serialization error.
    pub fn encode_record<R: CsvSerialize>(&mut self, record: &R) -> Result<()> {
        record.serialize_to(&mut self.writer)?;
        // end of line
        self.writer.write_record(None::<&[u8]>)?;
        Ok(())
    }

    /// Encodes a single record whose schema is determined at runtime.
    ///
    /// # Errors
    /// This function returns an error if it's unable to write to the
    /// underlying writer or there's a serialization error.
    pub fn encode_record_ref(&mut self, record: &RecordEnum) -> Result<()> {
        match record {
            RecordEnum::Timestamp(rec) => self.encode_record(rec),
            RecordEnum::SystemEvent(rec) => self.encode_record(rec),
            RecordEnum::StockDirectory(rec) => self.encode_record(rec),
            RecordEnum::TradingAction(rec) => self.encode_record(rec),
            RecordEnum::RegSho(rec) => self.encode_record(rec),
            RecordEnum::MarketParticipantPosition(rec) => self.encode_record(rec),
            RecordEnum::BrokenTrade(rec) => self.encode_record(rec),
            RecordEnum::Imbalance(rec) => self.encode_record(rec),
            RecordEnum::RetailPriceImprovement(rec) => self.encode_record(rec),
            RecordEnum::AddOrder(rec) => self.encode_record(rec),
            RecordEnum::AddOrderMpid(rec) => self.encode_record(rec),
            RecordEnum::OrderExecuted(rec) => self.encode_record(rec),
            RecordEnum::OrderExecutedWithPrice(rec) => self.encode_record(rec),
            RecordEnum::OrderCancel(rec) => self.encode_record(rec),
            RecordEnum::OrderDelete(rec) => self.encode_record(rec),
            RecordEnum::OrderReplace(rec) => self.encode_record(rec),
            RecordEnum::Trade(rec) => self.encode_record(rec),
            RecordEnum::CrossTrade(rec) => self.encode_record(rec),
        }
    }

    /// Encodes records directly from `decoder` until its input is exhausted,
    /// preserving input order, then flushes.
    ///
    /// # Errors
    /// This function returns an error if decoding fails or if it's unable to
    /// write to the underlying writer. Records encoded before the failure
    /// remain in the output.
    pub fn encode_decoded<R: io::Read>(&mut self, mut decoder: RecordDecoder<R>) -> Result<()> {
        while let Some(record) = decoder.decode_record()? {
            self.encode_record_ref(&record)?;
        }
        self.flush()
    }

    /// Flushes any buffered content to the true output.
    ///
    /// # Errors
    /// This function returns an error if it's unable to flush the underlying
    /// writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::io(e, "flushing CSV writer"))
    }
}

/// Serialization of a record to a CSV row. The first field written is always
/// the record's literal type-code letter, followed by its fields in wire
/// order.
pub trait CsvSerialize: Record {
    /// Serializes the record to `csv_writer`, without the line terminator.
    ///
    /// # Errors
    /// This function returns an error if it's unable to write to the
    /// underlying writer.
    fn serialize_to<W: io::Write>(&self, csv_writer: &mut csv::Writer<W>) -> csv::Result<()>;
}

fn write_type_code<W: io::Write, R: Record>(csv_writer: &mut csv::Writer<W>) -> csv::Result<()> {
    csv_writer.write_field([u8::from(R::TYPE)])
}

fn write_uint<W: io::Write, I: itoa::Integer>(
    csv_writer: &mut csv::Writer<W>,
    value: I,
) -> csv::Result<()> {
    let mut buf = itoa::Buffer::new();
    csv_writer.write_field(buf.format(value))
}

// One-byte code fields are emitted as their raw ASCII byte, like the
// fixed-width fields, not as a decimal.
fn write_code_byte<W: io::Write>(csv_writer: &mut csv::Writer<W>, byte: u8) -> csv::Result<()> {
    csv_writer.write_field([byte])
}

impl CsvSerialize for TimestampMsg {
    fn serialize_to<W: io::Write>(&self, csv_writer: &mut csv::Writer<W>) -> csv::Result<()> {
        write_type_code::<W, Self>(csv_writer)?;
        write_uint(csv_writer, self.seconds)
    }
}

impl CsvSerialize for SystemEventMsg {
    fn serialize_to<W: io::Write>(&self, csv_writer: &mut csv::Writer<W>) -> csv::Result<()> {
        write_type_code::<W, Self>(csv_writer)?;
        write_uint(csv_writer, self.nanoseconds)?;
        write_code_byte(csv_writer, self.event_code)
    }
}

impl CsvSerialize for StockDirectoryMsg {
    fn serialize_to<W: io::Write>(&self, csv_writer: &mut csv::Writer<W>) -> csv::Result<()> {
        write_type_code::<W, Self>(csv_writer)?;
        write_uint(csv_writer, self.nanoseconds)?;
        csv_writer.write_field(self.ticker)?;
        write_code_byte(csv_writer, self.mkt_category)?;
        write_code_byte(csv_writer, self.fin_status)?;
        write_uint(csv_writer, self.round_lot_size)?;
        write_code_byte(csv_writer, self.round_lot_status)
    }
}

impl CsvSerialize for TradingActionMsg {
    fn serialize_to<W: io::Write>(&self, csv_writer: &mut csv::Writer<W>) -> csv::Result<()> {
        write_type_code::<W, Self>(csv_writer)?;
        write_uint(csv_writer, self.nanoseconds)?;
        csv_writer.write_field(self.ticker)?;
        write_code_byte(csv_writer, self.trading_state)?;
        csv_writer.write_field(self.reason)
    }
}

impl CsvSerialize for RegShoMsg {
    fn serialize_to<W: io::Write>(&self, csv_writer: &mut csv::Writer<W>) -> csv::Result<()> {
        write_type_code::<W, Self>(csv_writer)?;
        write_uint(csv_writer, self.nanoseconds)?;
        csv_writer.write_field(self.ticker)?;
        write_code_byte(csv_writer, self.reg_sho_action)
    }
}

impl CsvSerialize for MarketParticipantPosMsg {
    fn serialize_to<W: io::Write>(&self, csv_writer: &mut csv::Writer<W>) -> csv::Result<()> {
        write_type_code::<W, Self>(csv_writer)?;
        write_uint(csv_writer, self.nanoseconds)?;
        csv_writer.write_field(self.mpid)?;
        csv_writer.write_field(self.ticker)?;
        write_code_byte(csv_writer, self.mm_status)?;
        write_code_byte(csv_writer, self.mm_mode)?;
        write_code_byte(csv_writer, self.mp_status)
    }
}

impl CsvSerialize for BrokenTradeMsg {
    fn serialize_to<W: io::Write>(&self, csv_writer: &mut csv::Writer<W>) -> csv::Result<()> {
        write_type_code::<W, Self>(csv_writer)?;
        write_uint(csv_writer, self.nanoseconds)?;
        write_uint(csv_writer, self.match_number)
    }
}

impl CsvSerialize for ImbalanceMsg {
    fn serialize_to<W: io::Write>(&self, csv_writer: &mut csv::Writer<W>) -> csv::Result<()> {
        write_type_code::<W, Self>(csv_writer)?;
        write_uint(csv_writer, self.nanoseconds)?;
        write_uint(csv_writer, self.paired_shares)?;
        write_uint(csv_writer, self.imbalance_shares)?;
        write_code_byte(csv_writer, self.direction)?;
        csv_writer.write_field(self.ticker)?;
        write_uint(csv_writer, self.far_price)?;
        write_uint(csv_writer, self.near_price)?;
        write_uint(csv_writer, self.current_price)?;
        write_code_byte(csv_writer, self.cross_type)?;
        write_code_byte(csv_writer, self.price_var)
    }
}

impl CsvSerialize for RetailPriceImprovementMsg {
    fn serialize_to<W: io::Write>(&self, csv_writer: &mut csv::Writer<W>) -> csv::Result<()> {
        write_type_code::<W, Self>(csv_writer)?;
        write_uint(csv_writer, self.nanoseconds)?;
        csv_writer.write_field(self.ticker)?;
        write_code_byte(csv_writer, self.interest)
    }
}

impl CsvSerialize for AddOrderMsg {
    fn serialize_to<W: io::Write>(&self, csv_writer: &mut csv::Writer<W>) -> csv::Result<()> {
        write_type_code::<W, Self>(csv_writer)?;
        write_uint(csv_writer, self.nanoseconds)?;
        write_uint(csv_writer, self.ref_num)?;
        write_code_byte(csv_writer, self.buy_status)?;
        write_uint(csv_writer, self.quantity)?;
        csv_writer.write_field(self.ticker)?;
        write_uint(csv_writer, self.price)
    }
}

impl CsvSerialize for AddOrderMpidMsg {
    fn serialize_to<W: io::Write>(&self, csv_writer: &mut csv::Writer<W>) -> csv::Result<()> {
        write_type_code::<W, Self>(csv_writer)?;
        write_uint(csv_writer, self.nanoseconds)?;
        write_uint(csv_writer, self.ref_num)?;
        write_code_byte(csv_writer, self.buy_status)?;
        write_uint(csv_writer, self.quantity)?;
        csv_writer.write_field(self.ticker)?;
        write_uint(csv_writer, self.price)?;
        csv_writer.write_field(self.mpid)
    }
}

impl CsvSerialize for OrderExecutedMsg {
    fn serialize_to<W: io::Write>(&self, csv_writer: &mut csv::Writer<W>) -> csv::Result<()> {
        write_type_code::<W, Self>(csv_writer)?;
        write_uint(csv_writer, self.nanoseconds)?;
        write_uint(csv_writer, self.ref_num)?;
        write_uint(csv_writer, self.quantity)?;
        write_uint(csv_writer, self.match_number)
    }
}

impl CsvSerialize for OrderExecutedWithPriceMsg {
    fn serialize_to<W: io::Write>(&self, csv_writer: &mut csv::Writer<W>) -> csv::Result<()> {
        write_type_code::<W, Self>(csv_writer)?;
        write_uint(csv_writer, self.nanoseconds)?;
        write_uint(csv_writer, self.ref_num)?;
        write_uint(csv_writer, self.quantity)?;
        write_uint(csv_writer, self.match_number)?;
        write_code_byte(csv_writer, self.printable)?;
        write_uint(csv_writer, self.price)
    }
}

impl CsvSerialize for OrderCancelMsg {
    fn serialize_to<W: io::Write>(&self, csv_writer: &mut csv::Writer<W>) -> csv::Result<()> {
        write_type_code::<W, Self>(csv_writer)?;
        write_uint(csv_writer, self.nanoseconds)?;
        write_uint(csv_writer, self.ref_num)?;
        write_uint(csv_writer, self.quantity)
    }
}

impl CsvSerialize for OrderDeleteMsg {
    fn serialize_to<W: io::Write>(&self, csv_writer: &mut csv::Writer<W>) -> csv::Result<()> {
        write_type_code::<W, Self>(csv_writer)?;
        write_uint(csv_writer, self.nanoseconds)?;
        write_uint(csv_writer, self.ref_num)
    }
}

impl CsvSerialize for OrderReplaceMsg {
    fn serialize_to<W: io::Write>(&self, csv_writer: &mut csv::Writer<W>) -> csv::Result<()> {
        write_type_code::<W, Self>(csv_writer)?;
        write_uint(csv_writer, self.nanoseconds)?;
        write_uint(csv_writer, self.old_ref_num)?;
        write_uint(csv_writer, self.ref_num)?;
        write_uint(csv_writer, self.quantity)?;
        write_uint(csv_writer, self.price)
    }
}

impl CsvSerialize for TradeMsg {
    fn serialize_to<W: io::Write>(&self, csv_writer: &mut csv::Writer<W>) -> csv::Result<()> {
        write_type_code::<W, Self>(csv_writer)?;
        write_uint(csv_writer, self.nanoseconds)?;
        write_uint(csv_writer, self.ref_num)?;
        write_code_byte(csv_writer, self.buy_status)?;
        write_uint(csv_writer, self.quantity)?;
        csv_writer.write_field(self.ticker)?;
        write_uint(csv_writer, self.price)?;
        write_uint(csv_writer, self.match_number)
    }
}

impl CsvSerialize for CrossTradeMsg {
    fn serialize_to<W: io::Write>(&self, csv_writer: &mut csv::Writer<W>) -> csv::Result<()> {
        write_type_code::<W, Self>(csv_writer)?;
        write_uint(csv_writer, self.nanoseconds)?;
        write_uint(csv_writer, self.cross_quantity)?;
        csv_writer.write_field(self.ticker)?;
        write_uint(csv_writer, self.price)?;
        write_uint(csv_writer, self.match_number)?;
        write_code_byte(csv_writer, self.cross_type)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rstest::rstest;

    use super::*;

    fn encode_one<R: CsvSerialize>(record: &R) -> String {
        let mut buf = Vec::new();
        let mut encoder = Encoder::new(&mut buf);
        encoder.encode_record(record).unwrap();
        encoder.flush().unwrap();
        drop(encoder);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_encode_add_order() {
        let rec = AddOrderMsg {
            nanoseconds: 1000,
            ref_num: 42,
            buy_status: b'B',
            quantity: 500,
            ticker: *b"AAPL    ",
            price: 1_500_000,
        };
        assert_eq!(encode_one(&rec), "A,1000,42,B,500,AAPL    ,1500000\n");
    }

    #[test]
    fn test_encode_preserves_ticker_padding() {
        let rec = RegShoMsg {
            nanoseconds: 55,
            ticker: *b"IBM     ",
            reg_sho_action: b'1',
        };
        assert_eq!(encode_one(&rec), "Y,55,IBM     ,1\n");
    }

    #[rstest]
    #[case::timestamp(TimestampMsg { seconds: 34_200 }.into(), "T,34200\n")]
    #[case::system_event(
        SystemEventMsg { nanoseconds: 9, event_code: b'O' }.into(),
        "S,9,O\n"
    )]
    #[case::broken_trade(
        BrokenTradeMsg { nanoseconds: 3, match_number: u64::MAX }.into(),
        "B,3,18446744073709551615\n"
    )]
    #[case::order_delete(
        OrderDeleteMsg { nanoseconds: 15, ref_num: 600 }.into(),
        "D,15,600\n"
    )]
    #[case::order_replace(
        OrderReplaceMsg {
            nanoseconds: 4,
            old_ref_num: 11,
            ref_num: 12,
            quantity: 300,
            price: 995_000,
        }.into(),
        "U,4,11,12,300,995000\n"
    )]
    #[case::add_order_mpid(
        AddOrderMpidMsg {
            nanoseconds: 21,
            ref_num: 9,
            buy_status: b'S',
            quantity: 75,
            ticker: *b"NVDA    ",
            price: 480_100,
            mpid: *b"LEHM",
        }.into(),
        "F,21,9,S,75,NVDA    ,480100,LEHM\n"
    )]
    #[case::imbalance(
        ImbalanceMsg {
            nanoseconds: 1,
            paired_shares: 2,
            imbalance_shares: 3,
            direction: b'B',
            ticker: *b"SPY     ",
            far_price: 4,
            near_price: 5,
            current_price: 6,
            cross_type: b'C',
            price_var: b'A',
        }.into(),
        "I,1,2,3,B,SPY     ,4,5,6,C,A\n"
    )]
    fn test_encode_record_ref(#[case] record: RecordEnum, #[case] expected: &str) {
        let mut buf = Vec::new();
        let mut encoder = Encoder::new(&mut buf);
        encoder.encode_record_ref(&record).unwrap();
        encoder.flush().unwrap();
        drop(encoder);
        assert_eq!(String::from_utf8(buf).unwrap(), expected);
    }

    // A batch of every schema in mixed order survives decode then encode with
    // the same record count and order.
    #[test]
    fn test_encode_decoded_all_schemas() {
        let mut bytes = Vec::new();
        let push_u32 = |bytes: &mut Vec<u8>, v: u32| bytes.extend_from_slice(&v.to_be_bytes());
        let push_u64 = |bytes: &mut Vec<u8>, v: u64| bytes.extend_from_slice(&v.to_be_bytes());

        // T
        bytes.push(b'T');
        push_u32(&mut bytes, 34_200);
        // R
        bytes.push(b'R');
        push_u32(&mut bytes, 1);
        bytes.extend_from_slice(b"AAPL    ");
        bytes.extend_from_slice(b"QN");
        push_u32(&mut bytes, 100);
        bytes.push(b'Y');
        // H
        bytes.push(b'H');
        push_u32(&mut bytes, 2);
        bytes.extend_from_slice(b"AAPL    ");
        bytes.push(b'T');
        bytes.push(0);
        bytes.extend_from_slice(b"    ");
        // Y
        bytes.push(b'Y');
        push_u32(&mut bytes, 3);
        bytes.extend_from_slice(b"AAPL    ");
        bytes.push(b'0');
        // L
        bytes.push(b'L');
        push_u32(&mut bytes, 4);
        bytes.extend_from_slice(b"MPID");
        bytes.extend_from_slice(b"AAPL    ");
        bytes.extend_from_slice(b"NNA");
        // S
        bytes.push(b'S');
        push_u32(&mut bytes, 5);
        bytes.push(b'Q');
        // A
        bytes.push(b'A');
        push_u32(&mut bytes, 6);
        push_u64(&mut bytes, 101);
        bytes.push(b'B');
        push_u32(&mut bytes, 500);
        bytes.extend_from_slice(b"AAPL    ");
        push_u32(&mut bytes, 1_500_000);
        // F
        bytes.push(b'F');
        push_u32(&mut bytes, 7);
        push_u64(&mut bytes, 102);
        bytes.push(b'S');
        push_u32(&mut bytes, 200);
        bytes.extend_from_slice(b"AAPL    ");
        push_u32(&mut bytes, 1_400_000);
        bytes.extend_from_slice(b"MPID");
        // E
        bytes.push(b'E');
        push_u32(&mut bytes, 8);
        push_u64(&mut bytes, 101);
        push_u32(&mut bytes, 100);
        push_u64(&mut bytes, 9001);
        // C
        bytes.push(b'C');
        push_u32(&mut bytes, 9);
        push_u64(&mut bytes, 101);
        push_u32(&mut bytes, 50);
        push_u64(&mut bytes, 9002);
        bytes.push(b'Y');
        push_u32(&mut bytes, 1_499_000);
        // X
        bytes.push(b'X');
        push_u32(&mut bytes, 10);
        push_u64(&mut bytes, 102);
        push_u32(&mut bytes, 25);
        // D
        bytes.push(b'D');
        push_u32(&mut bytes, 11);
        push_u64(&mut bytes, 102);
        // U
        bytes.push(b'U');
        push_u32(&mut bytes, 12);
        push_u64(&mut bytes, 101);
        push_u64(&mut bytes, 103);
        push_u32(&mut bytes, 350);
        push_u32(&mut bytes, 1_510_000);
        // P
        bytes.push(b'P');
        push_u32(&mut bytes, 13);
        push_u64(&mut bytes, 0);
        bytes.push(b'B');
        push_u32(&mut bytes, 40);
        bytes.extend_from_slice(b"AAPL    ");
        push_u32(&mut bytes, 1_505_000);
        push_u64(&mut bytes, 9003);
        // Q
        bytes.push(b'Q');
        push_u32(&mut bytes, 14);
        push_u64(&mut bytes, 12_345);
        bytes.extend_from_slice(b"AAPL    ");
        push_u32(&mut bytes, 1_500_500);
        push_u64(&mut bytes, 9004);
        bytes.push(b'O');
        // B
        bytes.push(b'B');
        push_u32(&mut bytes, 15);
        push_u64(&mut bytes, 9003);
        // I
        bytes.push(b'I');
        push_u32(&mut bytes, 16);
        push_u64(&mut bytes, 1000);
        push_u64(&mut bytes, 250);
        bytes.push(b'B');
        bytes.extend_from_slice(b"AAPL    ");
        push_u32(&mut bytes, 1_499_500);
        push_u32(&mut bytes, 1_500_000);
        push_u32(&mut bytes, 1_500_250);
        bytes.extend_from_slice(b"OL");
        // N
        bytes.push(b'N');
        push_u32(&mut bytes, 17);
        bytes.extend_from_slice(b"AAPL    ");
        bytes.push(b'A');

        let mut buf = Vec::new();
        let mut encoder = Encoder::new(&mut buf);
        encoder
            .encode_decoded(RecordDecoder::new(Cursor::new(bytes)))
            .unwrap();
        drop(encoder);
        let output = String::from_utf8(buf).unwrap();

        let type_codes: Vec<char> = output
            .lines()
            .map(|line| line.chars().next().unwrap())
            .collect();
        assert_eq!(
            type_codes,
            vec![
                'T', 'R', 'H', 'Y', 'L', 'S', 'A', 'F', 'E', 'C', 'X', 'D', 'U', 'P', 'Q', 'B',
                'I', 'N'
            ]
        );
        assert_eq!(output.lines().count(), 18);
        assert!(output.contains("A,6,101,B,500,AAPL    ,1500000\n"));
        assert!(output.contains("I,16,1000,250,B,AAPL    ,1499500,1500000,1500250,O,L\n"));
    }

    #[test]
    fn test_truncated_decode_keeps_prior_output() {
        let mut bytes = vec![b'T'];
        bytes.extend_from_slice(&34_200u32.to_be_bytes());
        bytes.push(b'A');
        bytes.extend_from_slice(&1000u32.to_be_bytes());
        // rest of the add order is missing

        let mut buf = Vec::new();
        let mut encoder = Encoder::new(&mut buf);
        let res = encoder.encode_decoded(RecordDecoder::new(Cursor::new(bytes)));
        assert!(matches!(res, Err(Error::Truncated { .. })));
        encoder.flush().unwrap();
        drop(encoder);
        assert_eq!(String::from_utf8(buf).unwrap(), "T,34200\n");
    }
}
