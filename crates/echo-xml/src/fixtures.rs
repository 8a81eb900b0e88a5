pub(crate) const PCP_DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- exported by panel -->
<SMARTSWITCH2>
  <CABINET VERSION="3.1.4" NAME="Main Hall">
    <RELAYS>
      <RELAY NUMBER="1" SPACE="1" ZONE="1"/>
      <RELAY NUMBER="2" SPACE="1" ZONE="2"/>
      <RELAY NUMBER="3" SPACE="17" ZONE="1" />
      <RELAY NUMBER="4" SPACE="0" ZONE="0"/>
    </RELAYS>
    <SPACES>
      <SPACE SPACEINRACK="1" NUMBER="1" NAME="Stage"/>
      <SPACE SPACEINRACKEXT="2" NUMBEREXT="17" NAMEEXT="Lobby &amp; Bar"/>
      <SPACE SPACEINRACK="3" NUMBER="0" NAME=""/>
    </SPACES>
    <PRESETS>
      <PRESET NUMBER="1" NAME="Show">
        <PREFADELEVEL SPACEINRACK="1" UPTIME="3"/>
        <PREFADELEVEL SPACEINRACK="2" UPTIME='4'/>
        <PREFADELEVEL SPACEINRACK="3" UPTIME="9"/>
        <PRELEVEL RELAY="1" LEVEL="255"/>
        <PRELEVEL RELAY="2" LEVEL="128"/>
        <PRELEVEL RELAY="3" LEVEL="0"/>
        <PRELEVEL RELAY="4" LEVEL="7"/>
      </PRESET>
      <PRESET NUMBER="2" NAME="Clean up">
        <PREFADELEVEL  SPACEINRACK="1"   UPTIME="0"/>
        <PREFADELEVEL SPACEINRACK="2" UPTIME="12"/>
        <PRELEVEL RELAY="1" LEVEL="0"/>
        <PRELEVEL RELAY="2" LEVEL="64"/>
        <PRELEVEL RELAY="3" LEVEL="32"/>
        <PRELEVEL RELAY="4" LEVEL="1"/>
      </PRESET>
    </PRESETS>
    <![CDATA[opaque <data>]]>
  </CABINET>
</SMARTSWITCH2>
"#;

pub(crate) const ACP_DOC: &str = r#"<?xml version="1.0"?>
<EACP>
  <RACK VERSION="2.0.3" NAME="Studio">
    <OUTPUT NUMBER="1" SPACE="2" ZONE="1"/>
    <OUTPUT NUMBER="2" SPACE="2" ZONE="1"/>
    <SPACE SPACEINRACK="1" NUMBER="2" NAME="Booth"/>
    <PRESET NUMBER="5">
      <PREFADELEVEL SPACEINRACK="1" PREFADELEVEL="6"/>
      <PRELEVEL OUTPUT="1" LEVEL="10"/>
      <PRELEVEL OUTPUT="2" LEVEL="90"/>
    </PRESET>
  </RACK>
</EACP>
"#;
